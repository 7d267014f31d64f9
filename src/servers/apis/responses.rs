//! Common responses for the API shared by all the contexts.
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use super::API_LOG_TARGET;
use crate::core::error::{Error, Kind};

/// The body of every error response.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A body with only a human readable message.
#[derive(Serialize, Debug)]
pub struct MessageBody<'a> {
    pub message: &'a str,
}

#[must_use]
pub fn status_code(kind: Kind) -> StatusCode {
    match kind {
        Kind::Unauthorized => StatusCode::UNAUTHORIZED,
        Kind::Forbidden => StatusCode::FORBIDDEN,
        Kind::NotFound => StatusCode::NOT_FOUND,
        Kind::Validation | Kind::Conflict => StatusCode::BAD_REQUEST,
        Kind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// OK responses

#[must_use]
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, Json(body)).into_response()
}

#[must_use]
pub fn ok_response<T: Serialize>(body: &T) -> Response {
    json_response(StatusCode::OK, body)
}

#[must_use]
pub fn message_response(message: &str) -> Response {
    ok_response(&MessageBody { message })
}

// Error responses

/// It maps a domain error to its response.
///
/// Internal failures get a fixed message and the failure in `details`.
#[must_use]
pub fn error_response(err: &Error) -> Response {
    let kind = err.kind();

    let body = if kind == Kind::Internal {
        error!(target: API_LOG_TARGET, %err, "internal error");

        let message = match err {
            Error::Blob { .. } => "Failed to upload image",
            _ => "Internal server error",
        };

        ErrorBody {
            error: message.to_string(),
            details: Some(err.to_string()),
        }
    } else {
        ErrorBody {
            error: err.to_string(),
            details: None,
        }
    };

    json_response(status_code(kind), &body)
}

#[must_use]
pub fn bad_request_response(error: &str, details: Option<String>) -> Response {
    json_response(
        StatusCode::BAD_REQUEST,
        &ErrorBody {
            error: error.to_string(),
            details,
        },
    )
}

#[must_use]
pub fn invalid_body_response(rejection: &JsonRejection) -> Response {
    bad_request_response("Invalid request body", Some(rejection.body_text()))
}

#[must_use]
pub fn invalid_query_response(rejection: &QueryRejection) -> Response {
    bad_request_response("Invalid query parameters", Some(rejection.body_text()))
}
