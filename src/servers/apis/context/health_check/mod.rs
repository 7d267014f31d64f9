//! API health check endpoint.
//!
//! It is used to check the service is running. Especially for containers.
//!
//! # Health Check
//!
//! `GET /health_check`
//!
//! Returns the API status. The status is `Error`, with a `500` response, when
//! the document store can't be read.
//!
//! **Example request**
//!
//! ```bash
//! curl "http://127.0.0.1:3000/health_check"
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!     "status": "Ok"
//! }
//! ```
pub mod handlers;
pub mod resources;
pub mod routes;
