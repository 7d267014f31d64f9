//! Logic to run the REST API server.
//!
//! It contains two main structs: `ApiServer` and `Launcher`.
//!
//! The `ApiServer` is a state machine with two states, `Stopped` and
//! `Running`. It binds the socket, spawns the server task and stops it:
//!
//! 1. `ApiServer::<Stopped>::start` binds the address and spawns a new
//!    asynchronous task.
//! 2. `Launcher::start` serves the API on the spawned task until a halt
//!    signal arrives.
//! 3. `ApiServer::<Running>::stop` sends the halt signal and waits for the
//!    task, getting the launcher back.
//!
//! The socket is bound before the task is spawned, so a `Running` server
//! always knows its real address, even when the configuration asks for
//! port `0`.
use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use derive_more::Constructor;
use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tokio::sync::oneshot::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::routes::router;
use super::API_LOG_TARGET;
use crate::core::Campus;
use crate::servers::signals::{graceful_shutdown, Halted};
use crate::shared::DynError;

/// Errors that can occur when starting or stopping the API server.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to bind the api to {addr}: {err}")]
    UnableToBind { addr: SocketAddr, err: DynError },

    #[error("unable to get the local address of the api socket: {err}")]
    UnableToGetLocalAddress { err: DynError },

    #[error("unable to send the halt signal to the api server task")]
    UnableToSendHaltingMessage,

    #[error("the api server task did not finish: {err}")]
    UnableToJoinTask { err: DynError },
}

/// A REST API server instance controller with no state.
pub type StoppedApiServer = ApiServer<Stopped>;

/// A REST API server instance controller with a running state.
pub type RunningApiServer = ApiServer<Running>;

/// A REST API server instance controller.
///
/// It's a state machine that can be in two states: `Stopped` or `Running`.
pub struct ApiServer<S> {
    pub state: S,
}

/// The `Stopped` state of the `ApiServer` struct.
pub struct Stopped {
    launcher: Launcher,
}

/// The `Running` state of the `ApiServer` struct.
pub struct Running {
    pub binding: SocketAddr,
    pub halt_task: Sender<Halted>,
    pub task: JoinHandle<Launcher>,
}

impl ApiServer<Stopped> {
    #[must_use]
    pub fn new(launcher: Launcher) -> Self {
        Self {
            state: Stopped { launcher },
        }
    }

    /// Starts the API server with the given campus.
    ///
    /// # Errors
    ///
    /// It would return an error if the address can't be bound.
    pub fn start(self, campus: Arc<Campus>) -> Result<ApiServer<Running>, Error> {
        let launcher = self.state.launcher;

        let listener = std::net::TcpListener::bind(launcher.bind_to).map_err(|err| Error::UnableToBind {
            addr: launcher.bind_to,
            err: Arc::new(err),
        })?;

        listener.set_nonblocking(true).map_err(|err| Error::UnableToBind {
            addr: launcher.bind_to,
            err: Arc::new(err),
        })?;

        let binding = listener
            .local_addr()
            .map_err(|err| Error::UnableToGetLocalAddress { err: Arc::new(err) })?;

        let (tx_halt, rx_halt) = tokio::sync::oneshot::channel::<Halted>();

        let task = tokio::spawn(async move {
            launcher.start(campus, listener, binding, rx_halt).await;
            launcher
        });

        Ok(ApiServer {
            state: Running {
                binding,
                halt_task: tx_halt,
                task,
            },
        })
    }
}

impl ApiServer<Running> {
    /// Stops the API server.
    ///
    /// # Errors
    ///
    /// It would return an error if the halt channel is closed or the server
    /// task panicked.
    pub async fn stop(self) -> Result<ApiServer<Stopped>, Error> {
        self.state
            .halt_task
            .send(Halted::Normal)
            .map_err(|_| Error::UnableToSendHaltingMessage)?;

        let launcher = self
            .state
            .task
            .await
            .map_err(|err| Error::UnableToJoinTask { err: Arc::new(err) })?;

        Ok(ApiServer {
            state: Stopped { launcher },
        })
    }
}

/// A struct responsible for starting the API server.
#[derive(Constructor, Debug, Clone)]
pub struct Launcher {
    bind_to: SocketAddr,
    tls: Option<RustlsConfig>,
}

impl Launcher {
    /// Serves the API on an already bound listener until the halt signal or
    /// a global shutdown signal arrives.
    fn start(
        &self,
        campus: Arc<Campus>,
        listener: std::net::TcpListener,
        address: SocketAddr,
        rx_halt: Receiver<Halted>,
    ) -> BoxFuture<'static, ()> {
        let router = router(campus, address);

        let handle = Handle::new();

        tokio::task::spawn(graceful_shutdown(
            handle.clone(),
            rx_halt,
            format!("Shutting down API server on socket address: {address}"),
        ));

        let protocol = if self.tls.is_some() { "https" } else { "http" };

        info!(target: API_LOG_TARGET, "Starting on {protocol}://{address}");

        let running = match self.tls.clone() {
            Some(tls) => axum_server::from_tcp_rustls(listener, tls)
                .handle(handle)
                .serve(router.into_make_service_with_connect_info::<SocketAddr>())
                .boxed(),
            None => axum_server::from_tcp(listener)
                .handle(handle)
                .serve(router.into_make_service_with_connect_info::<SocketAddr>())
                .boxed(),
        };

        async move {
            if let Err(err) = running.await {
                error!(target: API_LOG_TARGET, %err, "API server stopped with an error");
            }

            info!(target: API_LOG_TARGET, "Stopped server running on: {protocol}://{address}");
        }
        .boxed()
    }
}
