use campus_quest::{app, bootstrap};
use tracing::info;

#[tokio::main]
async fn main() {
    let (config, campus) = bootstrap::app::setup();

    let jobs = app::start(&config, campus).await;

    // handle the signals
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Campus Quest shutting down..");

            // Await for all jobs to shutdown
            futures::future::join_all(jobs).await;
            info!("Campus Quest successfully shutdown.");
        }
    }
}
