//! API contexts.
//!
//! Each context groups the endpoints of one resource:
//!
//! - [`quests`]: quest lifecycle.
//! - [`users`]: user documents, inventory, journeys and leaderboard.
//! - [`upload`]: image upload.
//! - [`health_check`]: liveness probe.
pub mod health_check;
pub mod quests;
pub mod upload;
pub mod users;
