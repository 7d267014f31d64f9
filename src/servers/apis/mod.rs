//! The REST API.
//!
//! The API is the only delivery layer of the game. It is a JSON API over
//! HTTP, optionally served over HTTPS.
//!
//! # Table of contents
//!
//! - [Configuration](#configuration)
//! - [Authentication](#authentication)
//! - [Errors](#errors)
//! - [Endpoints](#endpoints)
//!
//! # Configuration
//!
//! ```toml
//! [http_api]
//! bind_address = "127.0.0.1:3000"
//! max_upload_size = 5242880
//! ```
//!
//! The `[http_api.tsl_config]` section enables HTTPS.
//!
//! # Authentication
//!
//! Most endpoints require a bearer credential:
//!
//! ```text
//! Authorization: Bearer PlayerToken
//! ```
//!
//! The credential is checked by the configured identity verifier. A missing
//! or rejected credential always gets a `401` response. Refer to the
//! [`auth`](crate::servers::apis::middlewares::auth) middleware.
//!
//! # Errors
//!
//! Every error response is a JSON object with an `error` field and,
//! sometimes, a `details` field with the underlying failure:
//!
//! ```json
//! {"error": "Forbidden: only the quest creator can approve quest 6b9f4c1a"}
//! ```
//!
//! Clients must branch on the status code, never on the text.
//!
//! Status | Meaning
//! ---|---
//! `400` | Malformed input or a business rule rejected the operation.
//! `401` | Missing or invalid credential.
//! `403` | The caller is not entitled to the resource.
//! `404` | The quest or user does not exist.
//! `500` | The store, the identity service or the blob store failed.
//!
//! # Endpoints
//!
//! - [Quests](crate::servers::apis::context::quests)
//! - [Users](crate::servers::apis::context::users)
//! - [Upload](crate::servers::apis::context::upload)
//! - [Health check](crate::servers::apis::context::health_check)
//!
//! Uploaded images are served under `/blobs`.
pub mod context;
pub mod middlewares;
pub mod responses;
pub mod routes;
pub mod server;

/// Log target for the API requests and server events.
pub const API_LOG_TARGET: &str = "API";
