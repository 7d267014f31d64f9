//! Quests: the quest document model and its repository.
//!
//! - [`quest`]: the stored document, its state machine and the creation input.
//! - [`repository`]: create, list, get and delete quest documents.
pub mod quest;
pub mod repository;
