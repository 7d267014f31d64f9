//! API routes for the [`health_check`](crate::servers::apis::context::health_check)
//! API context.
//!
//! - `GET /health_check`
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::handlers::health_check_handler;
use crate::core::Campus;

pub fn add(prefix: &str, router: Router, campus: &Arc<Campus>) -> Router {
    router.route(
        &format!("{prefix}/health_check"),
        get(health_check_handler).with_state(campus.clone()),
    )
}
