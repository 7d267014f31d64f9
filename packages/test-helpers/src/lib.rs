//! Testing helpers for the Campus Quest backend.
pub mod configuration;
pub mod random;
