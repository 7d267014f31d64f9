//! Authentication middleware for the API.
//!
//! It reads the bearer credential from the `Authorization` header:
//!
//! ```text
//! Authorization: Bearer <credential>
//! ```
//!
//! and asks the [`Campus`] identity verifier for the user id. The id is
//! inserted into the request extensions as a [`Caller`], which handlers
//! extract with `Extension<Caller>`.
//!
//! Requests without a valid credential never reach the handler: they get a
//! `401` response.
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use tracing::debug;

use crate::core::users::user::UserId;
use crate::core::Campus;
use crate::servers::apis::responses::error_response;
use crate::servers::apis::API_LOG_TARGET;

/// The authenticated user of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

/// Middleware for bearer credential authentication.
pub async fn auth(State(campus): State<Arc<Campus>>, mut request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    match campus.authenticate(authorization.as_deref()).await {
        Ok(user_id) => {
            request.extensions_mut().insert(Caller(user_id));
            next.run(request).await
        }
        Err(err) => {
            debug!(target: API_LOG_TARGET, %err, "request rejected");
            error_response(&err)
        }
    }
}

/// It puts the methods of a route behind the [`auth`] middleware.
///
/// Only the methods in `method_router` are protected, so a public `GET` can
/// be merged with an authenticated method on the same path.
pub fn authenticated(method_router: MethodRouter<Arc<Campus>>, campus: &Arc<Campus>) -> MethodRouter {
    method_router
        .route_layer(middleware::from_fn_with_state(campus.clone(), auth))
        .with_state(campus.clone())
}
