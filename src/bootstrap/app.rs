//! Setup for the main application.
//!
//! The [`setup`] function builds the two main application dependencies:
//!
//! - The application configuration.
//! - The [`Campus`](crate::core::Campus) with all the domain services.
//!
//! Logging is initialized in between, so the rest of the set-up is traced.
use std::sync::Arc;

use campus_quest_configuration::Configuration;
use tracing::info;

use super::config::initialize_configuration;
use crate::bootstrap;
use crate::core::services::campus_factory;
use crate::core::Campus;

/// It loads the configuration from the environment and builds the main domain [`Campus`] struct.
#[must_use]
pub fn setup() -> (Configuration, Arc<Campus>) {
    let configuration = initialize_configuration();
    let campus = initialize_with_configuration(&configuration);

    info!("Configuration:\n{}", masked(&configuration).to_toml());

    (configuration, campus)
}

/// It initializes the application with the given configuration.
///
/// The configuration may be obtained from the environment (via config file or env vars).
#[must_use]
pub fn initialize_with_configuration(configuration: &Configuration) -> Arc<Campus> {
    initialize_logging(configuration);
    Arc::new(initialize_campus(configuration))
}

/// It builds the domain campus.
#[must_use]
pub fn initialize_campus(config: &Configuration) -> Campus {
    campus_factory(config)
}

/// It initializes the log threshold, format and channel.
pub fn initialize_logging(config: &Configuration) {
    bootstrap::logging::setup(config);
}

fn masked(configuration: &Configuration) -> Configuration {
    let mut configuration = configuration.clone();
    configuration.mask_secrets();
    configuration
}
