//! Typed access to stored documents.
//!
//! A [`Record`] keeps the raw stored [`Document`] next to its typed value.
//! Saving merges the typed fields over the raw document, so fields unknown
//! to the typed model survive a read-modify-write.
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::databases::{Collection, Document, Transaction};
use crate::core::error::Error;

/// A typed model stored in one collection.
pub trait Stored: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub key: String,
    document: Document,
    pub value: T,
}

impl<T: Stored> Record<T> {
    /// # Errors
    ///
    /// Will return `Err` if the document does not match the typed model.
    pub fn from_document(key: String, document: Document) -> Result<Self, Error> {
        let value = serde_json::from_value::<T>(Value::Object(document.clone())).map_err(|err| Error::Decode {
            what: T::COLLECTION.as_str(),
            key: key.clone(),
            err: Arc::new(err),
        })?;

        Ok(Self { key, document, value })
    }

    /// A record for a document that is not stored yet.
    #[must_use]
    pub fn new(key: String, value: T) -> Self {
        Self {
            key,
            document: Document::new(),
            value,
        }
    }

    /// It loads the record inside a transaction.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the query fails or the document does not match
    /// the typed model.
    pub fn load(tx: &mut dyn Transaction, key: &str) -> Result<Option<Self>, Error> {
        match tx.get(T::COLLECTION, key)? {
            Some(document) => Ok(Some(Self::from_document(key.to_owned(), document)?)),
            None => Ok(None),
        }
    }

    /// It writes the record inside a transaction.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn save(&self, tx: &mut dyn Transaction) -> Result<(), Error> {
        tx.set(T::COLLECTION, &self.key, &self.to_document()?)?;

        Ok(())
    }

    /// The stored document with the typed fields merged over it.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the value does not serialize into a JSON object.
    pub fn to_document(&self) -> Result<Document, Error> {
        let mut document = self.document.clone();

        for (field, value) in encode(&self.value)? {
            document.insert(field, value);
        }

        Ok(document)
    }

    /// Whether saving would change the stored document.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the value does not serialize into a JSON object.
    pub fn is_dirty(&self) -> Result<bool, Error> {
        Ok(self.to_document()? != self.document)
    }
}

/// It serializes a typed model into a document.
///
/// # Errors
///
/// Will return `Err` if the value does not serialize into a JSON object.
pub fn encode<T: Stored>(value: &T) -> Result<Document, Error> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(Error::Encode {
            what: T::COLLECTION.as_str(),
            err: Arc::from(Box::<dyn std::error::Error + Send + Sync>::from("the value is not a JSON object")),
        }),
        Err(err) => Err(Error::Encode {
            what: T::COLLECTION.as_str(),
            err: Arc::new(err),
        }),
    }
}
