//! Application services.
//!
//! - [`campus_factory`] builds the [`Campus`] and all its dependencies from
//!   the configuration.
//! - [`upload`] validates and stores images.
pub mod upload;

use std::sync::Arc;

use campus_quest_configuration::Configuration;

use crate::core::auth::verifier_factory;
use crate::core::blobs::LocalBlobStore;
use crate::core::databases::driver;
use crate::core::Campus;

/// It returns a new campus building its dependencies.
///
/// # Panics
///
/// Will panic if the database cannot be opened or its tables created.
#[must_use]
pub fn campus_factory(config: &Configuration) -> Campus {
    let database = match driver::build(&config.core.database.driver, &config.core.database.path) {
        Ok(database) => Arc::new(database),
        Err(error) => {
            panic!("{}", error)
        }
    };

    let blobs = Arc::new(LocalBlobStore::new(
        config.blob_store.root.clone(),
        config.blob_store.public_base_url.clone(),
    ));

    Campus::new(
        database,
        verifier_factory(&config.identity),
        blobs,
        config.core.rewards,
        config.http_api.max_upload_size,
    )
}
