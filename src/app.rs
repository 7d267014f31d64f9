//! Campus Quest application.
//!
//! The application has a global configuration for multiple jobs. It's
//! basically a container for other services.
//!
//! Jobs executed always:
//!
//! - REST API
//!
//! Optional jobs:
//!
//! - User fields backfill: it rewrites every user document adding the fields
//!   it is missing. Enabled with `core.backfill_user_fields`.
use std::sync::Arc;

use campus_quest_configuration::Configuration;
use tokio::task::JoinHandle;

use crate::bootstrap::jobs::{quest_api, user_backfill};
use crate::core;

/// # Panics
///
/// Will panic if the API server can't be started.
pub async fn start(config: &Configuration, campus: Arc<core::Campus>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    // Bring old user documents up to date
    if config.core.backfill_user_fields {
        jobs.push(user_backfill::start_job(&campus));
    }

    // Start the REST API
    jobs.push(quest_api::start_job(&config.http_api, campus.clone()).await);

    jobs
}
