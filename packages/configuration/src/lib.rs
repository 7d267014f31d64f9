//! Configuration data structures for the Campus Quest backend.
//!
//! This module contains the configuration data structures for the
//! Campus Quest backend, which is a REST API for a campus quest game.
//!
//! You can generate a sample configuration with:
//!
//! ```rust
//! use campus_quest_configuration::Configuration;
//!
//! let config = Configuration::default();
//! ```
//!
//! Refer to the [`v1`] module for the full list of sections and options.
pub mod v1;
pub mod validator;

use std::env;
use std::panic::Location;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use thiserror::Error;

use crate::validator::SemanticValidationError;

/// Maximum size in bytes of an uploaded image, 5 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

// Environment variables

/// The whole `campus-quest.toml` file content. It has priority over the
/// config file, even if the file is not on the default path.
const ENV_VAR_CONFIG_TOML: &str = "CAMPUS_QUEST_CONFIG_TOML";

/// The `campus-quest.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "CAMPUS_QUEST_CONFIG_TOML_PATH";

/// Prefix for env vars that overwrite single configuration options.
pub const CONFIG_OVERRIDE_PREFIX: &str = "CAMPUS_QUEST_CONFIG_OVERRIDE_";

/// Path separator in env var names for nested values in configuration.
pub const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

pub type Configuration = v1::Configuration;
pub type Core = v1::core::Core;
pub type Rewards = v1::core::Rewards;
pub type Database = v1::database::Database;
pub type DatabaseDriver = v1::database::Driver;
pub type HttpApi = v1::http_api::HttpApi;
pub type Identity = v1::identity::Identity;
pub type IdentityVerifier = v1::identity::Verifier;
pub type BlobStore = v1::blob_store::BlobStore;
pub type Logging = v1::logging::Logging;
pub type Threshold = v1::logging::Threshold;

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
}

impl Info {
    /// Build Configuration Info
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to obtain a configuration.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(default_config_toml_path: String) -> Result<Self, Error> {
        let config_toml = if let Ok(config_toml) = env::var(ENV_VAR_CONFIG_TOML) {
            println!("Loading configuration from environment variable:\n {config_toml}");
            Some(config_toml)
        } else {
            None
        };

        let config_toml_path = if let Ok(config_toml_path) = env::var(ENV_VAR_CONFIG_TOML_PATH) {
            println!("Loading configuration from file: `{config_toml_path}` ...");
            config_toml_path
        } else {
            println!("Loading configuration from default configuration file: `{default_config_toml_path}` ...");
            default_config_toml_path
        };

        Ok(Self {
            config_toml,
            config_toml_path,
        })
    }

    /// Configuration info with an inline TOML document. Used mostly in tests.
    #[must_use]
    pub fn from_toml(config_toml: &str) -> Self {
        Self {
            config_toml: Some(config_toml.to_owned()),
            config_toml_path: String::new(),
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Unable to load or extract the configuration from the sources.
    #[error("Failed processing the configuration: {source}, {location}")]
    ConfigError {
        source: Box<figment::Error>,
        location: &'static Location<'static>,
    },

    /// The configuration was parsed but some options are incompatible.
    #[error("Invalid configuration: {source}, {location}")]
    SemanticValidation {
        source: SemanticValidationError,
        location: &'static Location<'static>,
    },
}

impl From<figment::Error> for Error {
    #[track_caller]
    fn from(err: figment::Error) -> Self {
        Self::ConfigError {
            source: Box::new(err),
            location: Location::caller(),
        }
    }
}

impl From<SemanticValidationError> for Error {
    #[track_caller]
    fn from(err: SemanticValidationError) -> Self {
        Self::SemanticValidation {
            source: err,
            location: Location::caller(),
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct TslConfig {
    /// Path to the SSL certificate file.
    #[serde(default = "TslConfig::default_ssl_cert_path")]
    pub ssl_cert_path: Utf8PathBuf,

    /// Path to the SSL key file.
    #[serde(default = "TslConfig::default_ssl_key_path")]
    pub ssl_key_path: Utf8PathBuf,
}

impl TslConfig {
    fn default_ssl_cert_path() -> Utf8PathBuf {
        Utf8PathBuf::new()
    }

    fn default_ssl_key_path() -> Utf8PathBuf {
        Utf8PathBuf::new()
    }
}
