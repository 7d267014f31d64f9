//! API routes.
//!
//! It loads the routes of every API context. Authentication is added per
//! route by each context, so public and authenticated methods can share a
//! path (`GET /quests` and `POST /quests`).
//!
//! The API has no path prefix: `/quests`, `/users`, `/upload/image` and
//! `/health_check`. Uploaded images are served under `/blobs`.
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{info, Level, Span};
use uuid::Uuid;

use super::context;
use super::responses::{json_response, ErrorBody};
use super::API_LOG_TARGET;
use crate::core::Campus;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Add all API routes to the router.
#[allow(clippy::needless_pass_by_value)]
pub fn router(campus: Arc<Campus>, server_socket_addr: SocketAddr) -> Router {
    let router = Router::new();

    let prefix = "";

    let router = context::quests::routes::add(prefix, router, &campus);
    let router = context::users::routes::add(prefix, router, &campus);
    let router = context::upload::routes::add(prefix, router, &campus);
    let router = context::health_check::routes::add(prefix, router, &campus);

    let router = match campus.blob_root() {
        Some(root) => router.nest_service("/blobs", ServeDir::new(root)),
        None => router,
    };

    router
        .fallback(not_found_handler)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(PropagateHeaderLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(move |request: &Request<Body>, _span: &Span| {
                    let method = request.method().to_string();
                    let uri = request.uri().to_string();
                    let request_id = request_id_of(request.headers());

                    info!(
                        target: API_LOG_TARGET,
                        server_socket_addr = %server_socket_addr, method = %method, uri = %uri, request_id = %request_id, "request");
                })
                .on_response(move |response: &Response, latency: Duration, _span: &Span| {
                    let status_code = response.status();
                    let request_id = request_id_of(response.headers());
                    let latency_ms = latency.as_millis();

                    info!(
                        target: API_LOG_TARGET,
                        server_socket_addr = %server_socket_addr, latency = %latency_ms, status = %status_code, request_id = %request_id, "response");
                }),
        )
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            RequestIdGenerator,
        ))
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorBody {
            error: "Not found".to_string(),
            details: None,
        },
    )
}

fn request_id_of(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[derive(Clone, Default)]
struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
