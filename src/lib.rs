//! **Campus Quest** is a REST backend for a location-based quest game played
//! on a university campus.
//!
//! Players create quests bound to a place on campus, other players accept
//! them and submit a photo as proof of completion, and the creator approves
//! one submission. The approved player earns points and experience, which
//! unlock cosmetic inventory items and rank players on a leaderboard.
//!
//! # Table of contents
//!
//! - [Features](#features)
//! - [Services](#services)
//! - [Installation](#installation)
//! - [Configuration](#configuration)
//! - [Usage](#usage)
//! - [Components](#components)
//!
//! # Features
//!
//! - Quest lifecycle: create, accept, abandon, submit, review, approve, close.
//! - Points ledger with spendable points, leaderboard points and experience.
//! - Inventory unlocks, customisation and journey progress.
//! - Image uploads to a blob store.
//! - Bearer token authentication with a static or a remote identity verifier.
//! - Persistence with `SQLite3` or `MySQL`.
//!
//! # Services
//!
//! There is only one service, the REST API, which by default listens on
//! `127.0.0.1:3000`. An optional start-up job backfills missing fields in the
//! user documents.
//!
//! # Installation
//!
//! ```text
//! git clone https://github.com/campus-quest/campus-quest.git \
//!   && cd campus-quest \
//!   && cargo build --release \
//!   && mkdir -p ./storage/campus-quest/lib/database \
//!   && mkdir -p ./storage/campus-quest/blobs
//! ```
//!
//! # Configuration
//!
//! The default configuration file is
//! `./share/default/config/campus-quest.development.sqlite3.toml`. Another
//! file can be selected with the `CAMPUS_QUEST_CONFIG_TOML_PATH` env var, or
//! the whole TOML document can be injected with `CAMPUS_QUEST_CONFIG_TOML`.
//!
//! Refer to the `campus-quest-configuration` package for every option.
//!
//! # Usage
//!
//! ```text
//! cargo run
//! ```
//!
//! ```text
//! curl -X POST http://127.0.0.1:3000/quests \
//!   -H "Authorization: Bearer CreatorToken" \
//!   -H "Content-Type: application/json" \
//!   -d '{"name":"Find the Clock","radius":50,"reward":100,"type":"landmark","lat":-26.19,"lng":28.03}'
//! ```
//!
//! ```json
//! {"message":"Quest created","questId":"6b9f4c1ad5fb4b0d9bd1d0a3a6c3c5e7"}
//! ```
//!
//! # Components
//!
//! ```text
//! Delivery layer   Domain layer
//!
//!     REST API  |> Campus (quests, users, lifecycle)
//! ```
//!
//! - [`servers::apis`]: the REST API.
//! - [`core`]: the domain layer.
//! - [`bootstrap`]: configuration, logging and jobs.
use crate::shared::clock;

pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;
pub mod shared;

/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
