//! API routes for the [`upload`](crate::servers::apis::context::upload) API
//! context.
//!
//! - `POST /upload/image`
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use super::handlers::upload_image_handler;
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::authenticated;

/// Room for the multipart boundaries and headers around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// It adds the routes to the router for the [`upload`](crate::servers::apis::context::upload) API context.
pub fn add(prefix: &str, router: Router, campus: &Arc<Campus>) -> Router {
    let body_limit = campus.max_upload_size().saturating_add(MULTIPART_OVERHEAD);

    router.route(
        &format!("{prefix}/upload/image"),
        authenticated(post(upload_image_handler).layer(DefaultBodyLimit::max(body_limit)), campus),
    )
}
