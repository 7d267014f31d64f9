//! Shutdown signals for the API server.
//!
//! The server task stops when its controller sends [`Halted`] over a oneshot
//! channel (what [`ApiServer::stop`](crate::servers::apis::server::ApiServer::stop)
//! does) or when the process receives `ctrl_c` or `SIGTERM`. In-flight
//! requests, such as an approval moving points between users, get
//! [`GRACE_PERIOD`] to finish before their connections are closed.
use std::time::Duration;

use derive_more::Display;
use tracing::{error, info, warn};

const SIGNALS_LOG_TARGET: &str = "SIGNALS";

/// How long open connections may keep running after a shutdown signal.
pub const GRACE_PERIOD: Duration = Duration::from_secs(90);

/// The message a running API server task receives from its controller.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Halted {
    Normal,
}

/// Resolves on `ctrl_c` or the `terminate` signal.
///
/// A handler that can't be installed is logged and never resolves, so the
/// other signal and the halt channel keep working.
pub async fn global_shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: SIGNALS_LOG_TARGET, %err, "unable to listen for ctrl_c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!(target: SIGNALS_LOG_TARGET, %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {}
    }
}

/// Resolves when the controller halts the server or a global shutdown signal
/// arrives. A dropped controller counts as a halt.
pub async fn shutdown_signal(rx_halt: tokio::sync::oneshot::Receiver<Halted>) {
    let halt = async {
        rx_halt.await.unwrap_or_else(|_| {
            warn!(target: SIGNALS_LOG_TARGET, "the api server controller was dropped");
            Halted::Normal
        })
    };

    tokio::select! {
        signal = halt => { info!(target: SIGNALS_LOG_TARGET, %signal, "halt signal received") },
        () = global_shutdown_signal() => { info!(target: SIGNALS_LOG_TARGET, "process shutdown signal received") }
    }
}

/// It asks the server behind `handle` to stop accepting connections once a
/// shutdown signal arrives, logging `message` first.
pub async fn graceful_shutdown(handle: axum_server::Handle, rx_halt: tokio::sync::oneshot::Receiver<Halted>, message: String) {
    shutdown_signal(rx_halt).await;

    info!(target: SIGNALS_LOG_TARGET, "{message}");

    handle.graceful_shutdown(Some(GRACE_PERIOD));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{shutdown_signal, Halted};

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn it_should_resolve_when_the_server_is_halted() {
        let (tx_halt, rx_halt) = tokio::sync::oneshot::channel::<Halted>();

        tx_halt.send(Halted::Normal).unwrap();

        tokio::time::timeout(WAIT, shutdown_signal(rx_halt))
            .await
            .expect("it should stop waiting after the halt message");
    }

    #[tokio::test]
    async fn it_should_resolve_when_the_controller_is_dropped() {
        let (tx_halt, rx_halt) = tokio::sync::oneshot::channel::<Halted>();

        drop(tx_halt);

        tokio::time::timeout(WAIT, shutdown_signal(rx_halt))
            .await
            .expect("it should stop waiting once the controller is gone");
    }
}
