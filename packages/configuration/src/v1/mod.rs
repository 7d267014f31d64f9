//! Version `1` of the configuration.
//!
//! All options have a default value, so an empty TOML file is a valid
//! configuration. This is the default configuration in TOML format:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [core]
//! backfill_user_fields = false
//!
//! [core.database]
//! driver = "sqlite3"
//! path = "./storage/campus-quest/lib/database/sqlite3.db"
//!
//! [core.rewards]
//! creator_bonus = true
//! experience_per_level = 100
//!
//! [http_api]
//! bind_address = "127.0.0.1:3000"
//! max_upload_size = 5242880
//!
//! [identity]
//! verifier = "static"
//!
//! [identity.tokens]
//!
//! [blob_store]
//! root = "./storage/campus-quest/blobs"
//! public_base_url = "http://127.0.0.1:3000/blobs/"
//! ```
//!
//! Any option can be overwritten with an env var using the
//! [`CONFIG_OVERRIDE_PREFIX`](crate::CONFIG_OVERRIDE_PREFIX) prefix and the
//! [`CONFIG_OVERRIDE_SEPARATOR`](crate::CONFIG_OVERRIDE_SEPARATOR) between
//! nested keys. For example, to change the API bind address:
//!
//! ```text
//! CAMPUS_QUEST_CONFIG_OVERRIDE_HTTP_API__BIND_ADDRESS=0.0.0.0:8080
//! ```
//!
//! The `[http_api.tsl_config]` section enables HTTPS:
//!
//! ```toml
//! [http_api.tsl_config]
//! ssl_cert_path = "./storage/campus-quest/lib/tls/localhost.crt"
//! ssl_key_path = "./storage/campus-quest/lib/tls/localhost.key"
//! ```
pub mod blob_store;
pub mod core;
pub mod database;
pub mod http_api;
pub mod identity;
pub mod logging;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::blob_store::BlobStore;
use self::core::Core;
use self::http_api::HttpApi;
use self::identity::{Identity, Verifier};
use self::logging::Logging;
use crate::validator::{SemanticValidationError, Validator};
use crate::{Error, Info, CONFIG_OVERRIDE_PREFIX, CONFIG_OVERRIDE_SEPARATOR};

/// The whole backend configuration.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Core configuration: persistence and game rules.
    #[serde(default)]
    pub core: Core,

    /// The HTTP API configuration.
    #[serde(default)]
    pub http_api: HttpApi,

    /// How bearer credentials are turned into user ids.
    #[serde(default)]
    pub identity: Identity,

    /// Where uploaded images are stored.
    #[serde(default)]
    pub blob_store: BlobStore,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct. The whole
    /// configuration in toml format is included in the `info.config_toml`
    /// string, otherwise it is read from `info.config_toml_path`.
    ///
    /// Env vars with the override prefix have priority over both.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the source has a bad configuration or the
    /// configuration is semantically invalid.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = if let Some(config_toml) = &info.config_toml {
            Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::string(config_toml))
        } else {
            Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::file(&info.config_toml_path))
        };

        let figment = figment.merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR));

        let config: Configuration = figment.extract()?;

        config.validate()?;

        Ok(config)
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Panics
    ///
    /// Will panic if the configuration cannot be encoded into TOML.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string(self).expect("Could not encode TOML value")
    }

    /// Hides the credentials so the configuration can be logged.
    pub fn mask_secrets(&mut self) {
        self.identity.mask_secrets();
        self.core.database.mask_secrets();
    }
}

impl Validator for Configuration {
    fn validate(&self) -> Result<(), SemanticValidationError> {
        if self.identity.verifier == Verifier::Remote && self.identity.remote_url.is_none() {
            return Err(SemanticValidationError::MissingRemoteVerifierUrl);
        }

        if self.core.rewards.experience_per_level == 0 {
            return Err(SemanticValidationError::ZeroExperiencePerLevel);
        }

        if self.http_api.max_upload_size == 0 {
            return Err(SemanticValidationError::ZeroMaxUploadSize);
        }

        Ok(())
    }
}
