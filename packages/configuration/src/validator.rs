//! Trait to validate semantic errors.
//!
//! Errors could involve more than one configuration option. Some configuration
//! combinations can be incompatible.
use thiserror::Error;

/// Errors that can occur validating the configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticValidationError {
    #[error("The remote identity verifier requires the `identity.remote_url` option.")]
    MissingRemoteVerifierUrl,

    #[error("The `core.rewards.experience_per_level` option must be greater than zero.")]
    ZeroExperiencePerLevel,

    #[error("The `http_api.max_upload_size` option must be greater than zero.")]
    ZeroMaxUploadSize,
}

pub trait Validator {
    /// # Errors
    ///
    /// Will return an error if the configuration is invalid.
    fn validate(&self) -> Result<(), SemanticValidationError>;
}
