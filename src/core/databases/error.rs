//! Database errors.
//!
//! This module contains the [Database errors](crate::core::databases::error::Error).
use std::panic::Location;
use std::sync::Arc;

use campus_quest_configuration::DatabaseDriver;
use r2d2_mysql::mysql::UrlError;

use super::Collection;
use crate::shared::DynError;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The query was malformed or failed to run.
    #[error("The {driver} query was malformed: {err}, {location}")]
    InvalidQuery {
        err: DynError,
        driver: DatabaseDriver,
        location: &'static Location<'static>,
    },

    /// Unable to connect to the database
    #[error("Failed to connect to {driver} database: {err}, {location}")]
    ConnectionError {
        err: DynError,
        driver: DatabaseDriver,
        location: &'static Location<'static>,
    },

    /// Unable to create a connection pool
    #[error("Failed to create r2d2 {driver} connection pool: {err}, {location}")]
    ConnectionPool {
        err: DynError,
        driver: DatabaseDriver,
        location: &'static Location<'static>,
    },

    /// A stored body is not a JSON object.
    #[error("The {collection} document `{key}` is malformed: {err}, {location}")]
    MalformedDocument {
        collection: Collection,
        key: String,
        err: DynError,
        location: &'static Location<'static>,
    },

    /// The document to update does not exist.
    #[error("The {collection} document `{key}` does not exist, {location}")]
    DocumentNotFound {
        collection: Collection,
        key: String,
        location: &'static Location<'static>,
    },

    /// The transaction ended without running its body.
    #[error("The transaction was aborted before its body completed, {location}")]
    TransactionAborted { location: &'static Location<'static> },
}

impl From<r2d2_sqlite::rusqlite::Error> for Error {
    #[track_caller]
    fn from(err: r2d2_sqlite::rusqlite::Error) -> Self {
        Error::InvalidQuery {
            err: Arc::new(err),
            driver: DatabaseDriver::Sqlite3,
            location: Location::caller(),
        }
    }
}

impl From<r2d2_mysql::mysql::Error> for Error {
    #[track_caller]
    fn from(err: r2d2_mysql::mysql::Error) -> Self {
        Error::InvalidQuery {
            err: Arc::new(err),
            driver: DatabaseDriver::MySQL,
            location: Location::caller(),
        }
    }
}

impl From<UrlError> for Error {
    #[track_caller]
    fn from(err: UrlError) -> Self {
        Self::ConnectionError {
            err: Arc::new(err),
            driver: DatabaseDriver::MySQL,
            location: Location::caller(),
        }
    }
}

impl From<(r2d2::Error, DatabaseDriver)> for Error {
    #[track_caller]
    fn from(e: (r2d2::Error, DatabaseDriver)) -> Self {
        let (err, driver) = e;
        Self::ConnectionPool {
            err: Arc::new(err),
            driver,
            location: Location::caller(),
        }
    }
}
