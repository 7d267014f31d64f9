//! Errors returned by the core services.
//!
//! Every error has a [`Kind`]. The delivery layer only looks at the kind to
//! choose the response status; the message is for humans.
//!
//! Error | Kind | Description
//! ---|---|---
//! `Unauthenticated` | `Unauthorized` | The bearer credential is missing or was rejected by the identity verifier.
//! `NotQuestCreator` | `Forbidden` | The caller is not the creator of the quest.
//! `NotDocumentOwner` | `Forbidden` | The caller tried to use another user's document.
//! `CreatorCannotAccept` | `Forbidden` | The creator tried to accept their own quest.
//! `QuestNotFound`, `UserNotFound` | `NotFound` | The referenced document does not exist.
//! `MissingField`, `InvalidField`, `InvalidSubmissionIndex`, `NoFileUploaded`, `UnsupportedFileType`, `FileTooLarge` | `Validation` | Malformed input.
//! `QuestClosed`, `InsufficientPoints`, `AlreadyUnlocked`, `JourneyInProgress`, `NoJourneyInProgress` | `Conflict` | A business rule rejected the operation.
//! `Database`, `Blob`, `Decode`, `Encode` | `Internal` | The store or an external service failed.
use crate::core::auth;
use crate::core::blobs;
use crate::core::databases;
use crate::core::quests::quest::{QuestId, Operation};
use crate::core::users::user::UserId;
use crate::shared::DynError;

/// The class of an error, independent of its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    // Authentication errors
    #[error("Unauthorized: {source}")]
    Unauthenticated {
        #[from]
        source: auth::Error,
    },

    // Authorization errors
    #[error("Forbidden: only the quest creator can {action} quest {quest_id}")]
    NotQuestCreator { action: Operation, quest_id: QuestId },
    #[error("Forbidden: user {caller} cannot access the document of user {owner}")]
    NotDocumentOwner { caller: UserId, owner: UserId },
    #[error("Forbidden: the creator cannot accept their own quest {quest_id}")]
    CreatorCannotAccept { quest_id: QuestId },

    // Missing documents
    #[error("Quest {quest_id} not found")]
    QuestNotFound { quest_id: QuestId },
    #[error("User {user_id} not found")]
    UserNotFound { user_id: UserId },

    // Validation errors
    #[error("Missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Invalid submission index {index}")]
    InvalidSubmissionIndex { index: i64 },
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("Only image uploads are allowed, got `{content_type}`")]
    UnsupportedFileType { content_type: String },
    #[error("The file exceeds the maximum upload size of {max_upload_size} bytes")]
    FileTooLarge { max_upload_size: usize },

    // Business rule violations
    #[error("Quest {quest_id} is closed")]
    QuestClosed { quest_id: QuestId },
    #[error("Insufficient points: {available} available, {cost} required")]
    InsufficientPoints { available: u64, cost: u64 },
    #[error("Item `{item_id}` is already unlocked")]
    AlreadyUnlocked { item_id: String },
    #[error("A journey is already in progress for quest {quest_id}")]
    JourneyInProgress { quest_id: QuestId },
    #[error("No journey in progress")]
    NoJourneyInProgress,

    // Internal errors
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: databases::error::Error,
    },
    #[error("Failed to upload image: {source}")]
    Blob {
        #[from]
        source: blobs::Error,
    },
    #[error("The stored {what} `{key}` could not be decoded: {err}")]
    Decode { what: &'static str, key: String, err: DynError },
    #[error("The {what} could not be encoded as a document: {err}")]
    Encode { what: &'static str, err: DynError },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Error::Unauthenticated { .. } => Kind::Unauthorized,
            Error::NotQuestCreator { .. } | Error::NotDocumentOwner { .. } | Error::CreatorCannotAccept { .. } => Kind::Forbidden,
            Error::QuestNotFound { .. } | Error::UserNotFound { .. } => Kind::NotFound,
            Error::MissingField { .. }
            | Error::InvalidField { .. }
            | Error::InvalidSubmissionIndex { .. }
            | Error::NoFileUploaded
            | Error::UnsupportedFileType { .. }
            | Error::FileTooLarge { .. } => Kind::Validation,
            Error::QuestClosed { .. }
            | Error::InsufficientPoints { .. }
            | Error::AlreadyUnlocked { .. }
            | Error::JourneyInProgress { .. }
            | Error::NoJourneyInProgress => Kind::Conflict,
            Error::Database { .. } | Error::Blob { .. } | Error::Decode { .. } | Error::Encode { .. } => Kind::Internal,
        }
    }
}
