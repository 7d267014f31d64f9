//! API handlers for the [`health_check`](crate::servers::apis::context::health_check)
//! API context.
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::resources::{Report, Status};
use crate::core::databases::Collection;
use crate::core::Campus;
use crate::servers::apis::API_LOG_TARGET;

/// A key no document uses, read to probe the store.
const PROBE_KEY: &str = "health-check-probe";

/// Endpoint for container health check.
pub async fn health_check_handler(State(campus): State<Arc<Campus>>) -> (StatusCode, Json<Report>) {
    match campus.database.get(Collection::Users, PROBE_KEY) {
        Ok(_) => (StatusCode::OK, Json(Report { status: Status::Ok })),
        Err(err) => {
            error!(target: API_LOG_TARGET, %err, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Report { status: Status::Error }))
        }
    }
}
