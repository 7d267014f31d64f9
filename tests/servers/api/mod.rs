use std::sync::Arc;

use campus_quest::core::Campus;
use campus_quest::servers::apis::server;

pub mod asserts;
pub mod client;
pub mod connection_info;
pub mod contract;
pub mod environment;

pub type Started = environment::Environment<server::Running>;

/// It forces a database error by dropping all tables.
/// That makes any query fail.
pub fn force_database_error(campus: &Arc<Campus>) {
    campus.drop_database_tables().unwrap();
}
