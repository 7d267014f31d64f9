//! The core `campus` module contains the quest game logic, which is
//! independent of the delivery layer.
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!                  |> Quest lifecycle --> Quest repository
//!         REST API |                  \-> User ledger
//!                  |                  \-> Sweeper
//!                  |> Identity verifier
//!                  |> Blob store
//! ```
//!
//! # Table of contents
//!
//! - [Campus](#campus)
//! - [Quests](#quests)
//! - [Users](#users)
//! - [Authentication](#authentication)
//! - [Persistence](#persistence)
//!
//! # Campus
//!
//! The [`Campus`] is a container for the domain services. It is built once at
//! start-up by [`services::campus_factory`] and shared by all request
//! handlers. Every service receives the database handle explicitly, there is
//! no global store client.
//!
//! # Quests
//!
//! A quest is a location-bound task created by one user and completed by
//! others. The [`lifecycle::QuestLifecycle`] enforces the state machine of a
//! quest:
//!
//! ```text
//!          accept / abandon / submit / remove submission
//!             +----+
//!             v    |
//! create --> Open -+-- approve / close --> Closed --> (deleted)
//! ```
//!
//! Approving a submission awards the reward to the approved user and closes
//! the quest. Closing removes the quest id from every user that accepted it
//! ([`sweeper::Sweeper`]) and deletes the quest document.
//!
//! # Users
//!
//! The [`users::ledger::UserLedger`] owns the user documents: points,
//! level, inventory, customisation and journey progress. Point balances never
//! go below zero.
//!
//! # Authentication
//!
//! Requests carry a bearer credential which an [`auth::IdentityVerifier`]
//! maps to a user id. Users can only read and change their own document.
//!
//! # Persistence
//!
//! Documents are JSON objects in two collections, `quests` and `users`.
//! Refer to the [`databases`] module for the supported drivers.
pub mod auth;
pub mod blobs;
pub mod databases;
pub mod error;
pub mod lifecycle;
pub mod quests;
pub mod records;
pub mod services;
pub mod sweeper;
pub mod users;

use std::sync::Arc;

use camino::Utf8PathBuf;
use campus_quest_configuration::Rewards;
use url::Url;

use self::auth::{IdentityVerifier, parse_bearer};
use self::blobs::BlobStore;
use self::databases::Database;
use self::error::Error;
use self::lifecycle::QuestLifecycle;
use self::quests::repository::QuestRepository;
use self::services::upload::{self, ImageUpload};
use self::users::ledger::UserLedger;
use self::users::user::UserId;

/// The domain services of the game.
pub struct Campus {
    pub database: Arc<Box<dyn Database>>,
    pub quests: Arc<QuestRepository>,
    pub users: Arc<UserLedger>,
    pub lifecycle: QuestLifecycle,
    identity: Arc<dyn IdentityVerifier>,
    blobs: Arc<dyn BlobStore>,
    max_upload_size: usize,
}

impl Campus {
    #[must_use]
    pub fn new(
        database: Arc<Box<dyn Database>>,
        identity: Arc<dyn IdentityVerifier>,
        blobs: Arc<dyn BlobStore>,
        rewards: Rewards,
        max_upload_size: usize,
    ) -> Self {
        let quests = Arc::new(QuestRepository::new(database.clone()));
        let users = Arc::new(UserLedger::new(database.clone(), rewards));
        let lifecycle = QuestLifecycle::new(database.clone(), quests.clone(), users.clone(), rewards);

        Self {
            database,
            quests,
            users,
            lifecycle,
            identity,
            blobs,
            max_upload_size,
        }
    }

    /// It returns the id of the user authenticated by an `Authorization`
    /// header value.
    ///
    /// # Errors
    ///
    /// Will return `Error::Unauthenticated` if the header is missing or
    /// malformed, or the verifier rejects the credential.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, Error> {
        let credential = parse_bearer(authorization)?;

        Ok(self.identity.verify(credential).await?)
    }

    /// It stores an image uploaded by the user.
    ///
    /// # Errors
    ///
    /// Will return an error if the file is not a valid image or the blob
    /// store fails.
    pub async fn upload_image(&self, user_id: &UserId, image: ImageUpload) -> Result<Url, Error> {
        upload::upload_image(self.blobs.as_ref(), user_id, image, self.max_upload_size).await
    }

    /// The local directory with the uploaded images, when the blob store
    /// keeps them on this host.
    #[must_use]
    pub fn blob_root(&self) -> Option<Utf8PathBuf> {
        self.blobs.local_root()
    }

    #[must_use]
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// It drops the database tables.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to drop tables.
    pub fn drop_database_tables(&self) -> Result<(), databases::error::Error> {
        self.database.drop_database_tables()
    }
}
