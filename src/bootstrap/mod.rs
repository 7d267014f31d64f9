//! Application bootstrapping.
//!
//! This module includes all the functions to build the application, its
//! dependencies, and run the jobs.
//!
//! Jobs are tasks executed concurrently: the REST API and the optional user
//! fields backfill.
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
