//! Modules with generic logic used by several modules.
//!
//! - [`clock`]: Times services.
pub mod clock;

/// A shareable, type-erased error used as the source of other errors.
pub type DynError = std::sync::Arc<dyn std::error::Error + Send + Sync>;
