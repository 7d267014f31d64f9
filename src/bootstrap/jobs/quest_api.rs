//! REST API job starter.
//!
//! The [`quest_api::start_job`](crate::bootstrap::jobs::quest_api::start_job)
//! function starts the REST API server.
//!
//! The function spawns a new asynchronous task, that task is the
//! "**launcher**". The "**launcher**" starts the actual server and the job
//! waits until the server is bound before returning, so the API is accepting
//! requests when `start_job` resolves.
//!
//! Refer to the `campus-quest-configuration` package for the API
//! configuration options.
use std::sync::Arc;

use campus_quest_configuration::HttpApi;
use tokio::task::JoinHandle;
use tracing::info;

use super::make_rust_tls;
use crate::core;
use crate::servers::apis::server::{ApiServer, Launcher};
use crate::servers::apis::API_LOG_TARGET;

/// This function starts a new API server with the provided configuration.
///
/// # Panics
///
/// It would panic if the TLS configuration is invalid or the server can't be
/// bound to the configured address.
pub async fn start_job(config: &HttpApi, campus: Arc<core::Campus>) -> JoinHandle<()> {
    let bind_to = config.bind_address;

    let tls = make_rust_tls(&config.tsl_config)
        .await
        .map(|tls| tls.expect("it should have a valid api tls configuration"));

    let server = ApiServer::new(Launcher::new(bind_to, tls))
        .start(campus)
        .expect("it should be able to start the api");

    info!(target: API_LOG_TARGET, "Started on: {}", server.state.binding);

    tokio::spawn(async move {
        assert!(!server.state.halt_task.is_closed(), "Halt channel should be open");
        server.state.task.await.expect("failed to close service");
    })
}
