//! The persistence module.
//!
//! Persistence is implemented with one [`Database`] trait: a small document
//! store where every document is a JSON object identified by a
//! [`Collection`] and a string key.
//!
//! There are two implementations of the trait (two drivers):
//!
//! - [`Mysql`](crate::core::databases::mysql::Mysql)
//! - [`Sqlite`](crate::core::databases::sqlite::Sqlite)
//!
//! > **NOTICE**: There are no database migrations. Both drivers use a single
//! table and the document schema lives in the domain modules.
//!
//! # Documents table
//!
//!  Field        | Sample data                                  | Description
//! ---|---|---
//!  `collection` | `quests`                                     | The collection the document belongs to
//!  `key`        | `0b8a7c3e9f4d4c1aa2a4d53c2b7e6f10`           | Unique key inside the collection
//!  `body`       | `{"name":"Find the Clock","radius":50.0,...}` | The JSON document
//!
//! # Consistency
//!
//! - [`Database::run_transaction`] runs a read-then-write unit. Every write of
//!   the unit commits, or none does.
//! - [`Database::batch`] applies a list of writes. Each write is atomic on its
//!   own document but the batch as a whole is not: a failure stops the batch
//!   and the writes already applied stay.
pub mod driver;
pub mod error;
pub mod mysql;
pub mod sqlite;

use std::marker::PhantomData;
use std::panic::Location;

use derive_more::Display;
use serde_json::Value;

use self::error::Error;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// The collections of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Collection {
    #[display(fmt = "quests")]
    Quests,
    #[display(fmt = "users")]
    Users,
}

impl Collection {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Quests => "quests",
            Collection::Users => "users",
        }
    }
}

/// A single document write.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Creates or replaces the whole document.
    Set(Document),
    /// Merges the top-level fields into an existing document.
    Update(Document),
    /// Removes every occurrence of `value` from the array `field`. Missing
    /// documents and missing fields are left as they are.
    ArrayRemove { field: String, value: Value },
    /// Deletes the document. Deleting a missing document is a no-op.
    Delete,
}

/// A write addressed to one document, used in batches.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub collection: Collection,
    pub key: String,
    pub write: Write,
}

impl DocumentWrite {
    #[must_use]
    pub fn new(collection: Collection, key: &str, write: Write) -> Self {
        Self {
            collection,
            key: key.to_owned(),
            write,
        }
    }
}

/// What to do with a transaction once its body has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Commit,
    Rollback,
}

/// The documents visible inside an open transaction.
///
/// Reads observe a consistent snapshot and documents read are locked until
/// the transaction ends.
pub trait Transaction {
    /// # Errors
    ///
    /// Will return `Err` if the query fails or the stored body is not a JSON
    /// object.
    fn get(&mut self, collection: Collection, key: &str) -> Result<Option<Document>, Error>;

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    fn set(&mut self, collection: Collection, key: &str, document: &Document) -> Result<(), Error>;

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    fn delete(&mut self, collection: Collection, key: &str) -> Result<(), Error>;
}

struct Builder<T>
where
    T: Database,
{
    phantom: PhantomData<T>,
}

impl<T> Builder<T>
where
    T: Database + 'static,
{
    /// .
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create a database.
    pub(self) fn build(db_path: &str) -> Result<Box<dyn Database>, Error> {
        Ok(Box::new(T::new(db_path)?))
    }
}

/// The persistence trait. It contains all the methods to interact with the database.
pub trait Database: Sync + Send {
    /// It instantiates a new database driver.
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create a database.
    fn new(db_path: &str) -> Result<Self, Error>
    where
        Self: std::marker::Sized;

    // Schema

    /// It generates the database tables. SQL queries are hardcoded in the trait
    /// implementation.
    ///
    /// # Errors
    ///
    /// Will return `Error` if unable to create own tables.
    fn create_database_tables(&self) -> Result<(), Error>;

    /// It drops the database tables.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to drop tables.
    fn drop_database_tables(&self) -> Result<(), Error>;

    // Documents

    /// It loads one document.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to load.
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Document>, Error>;

    /// It creates or replaces one document.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to save.
    fn set(&self, collection: Collection, key: &str, document: &Document) -> Result<(), Error>;

    /// It deletes one document. Deleting a missing document is not an error.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to delete.
    fn delete(&self, collection: Collection, key: &str) -> Result<(), Error>;

    /// It loads every document in the collection with its key, in the
    /// store-native order.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to load.
    fn list(&self, collection: Collection) -> Result<Vec<(String, Document)>, Error>;

    /// It loads the documents whose array `field` contains the string `value`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to load.
    fn query_array_contains(&self, collection: Collection, field: &str, value: &str) -> Result<Vec<(String, Document)>, Error>;

    /// It runs `body` inside one atomic transaction. The transaction is
    /// committed or rolled back depending on the returned [`Outcome`]. If the
    /// body fails to run a statement the driver rolls back too.
    ///
    /// Prefer the [`transaction`] helper, which carries the body result out.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to begin or commit the transaction.
    fn run_transaction(&self, body: &mut dyn FnMut(&mut dyn Transaction) -> Outcome) -> Result<(), Error>;

    /// It stores a new document under a fresh key assigned by the store and
    /// returns that key.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to save.
    fn insert(&self, collection: Collection, document: &Document) -> Result<String, Error> {
        let key = uuid::Uuid::new_v4().simple().to_string();

        self.set(collection, &key, document)?;

        Ok(key)
    }

    /// It merges the top-level `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Will return `Err` with [`Error::DocumentNotFound`] if the document does
    /// not exist, or if unable to save.
    fn update(&self, collection: Collection, key: &str, fields: &Document) -> Result<(), Error> {
        transaction(self, |tx| apply(tx, collection, key, &Write::Update(fields.clone())))
    }

    /// It applies the writes in order. Each write is atomic on its own
    /// document; the batch stops at the first failure.
    ///
    /// # Errors
    ///
    /// Will return the first write error. Writes before it are kept.
    fn batch(&self, writes: &[DocumentWrite]) -> Result<(), Error> {
        for document_write in writes {
            transaction(self, |tx| apply(tx, document_write.collection, &document_write.key, &document_write.write))?;
        }

        Ok(())
    }
}

/// It runs `body` inside one atomic transaction of `database` and returns its
/// result.
///
/// The transaction commits when `body` returns `Ok` and rolls back when it
/// returns `Err`. Business rejections raised in the body come out with their
/// own type, and store errors are converted with `E::from`.
///
/// # Errors
///
/// Will return the body error, or the store error if the transaction could
/// not begin or commit.
pub fn transaction<D, T, E, F>(database: &D, mut body: F) -> Result<T, E>
where
    D: Database + ?Sized,
    E: From<Error>,
    F: FnMut(&mut dyn Transaction) -> Result<T, E>,
{
    let mut result = None;

    database.run_transaction(&mut |tx| {
        let body_result = body(tx);

        let outcome = if body_result.is_ok() {
            Outcome::Commit
        } else {
            Outcome::Rollback
        };

        result = Some(body_result);

        outcome
    })?;

    match result {
        Some(result) => result,
        None => Err(Error::TransactionAborted {
            location: Location::caller(),
        }
        .into()),
    }
}

/// It applies one write inside an open transaction.
///
/// # Errors
///
/// Will return `Err` with [`Error::DocumentNotFound`] when updating a missing
/// document, or if a statement fails.
pub fn apply(tx: &mut dyn Transaction, collection: Collection, key: &str, write: &Write) -> Result<(), Error> {
    match write {
        Write::Set(document) => tx.set(collection, key, document),
        Write::Update(fields) => {
            let Some(mut document) = tx.get(collection, key)? else {
                return Err(Error::DocumentNotFound {
                    collection,
                    key: key.to_owned(),
                    location: Location::caller(),
                });
            };

            for (field, value) in fields {
                document.insert(field.clone(), value.clone());
            }

            tx.set(collection, key, &document)
        }
        Write::ArrayRemove { field, value } => {
            let Some(mut document) = tx.get(collection, key)? else {
                return Ok(());
            };

            let Some(Value::Array(items)) = document.get_mut(field) else {
                return Ok(());
            };

            let before = items.len();
            items.retain(|item| item != value);

            if items.len() == before {
                return Ok(());
            }

            tx.set(collection, key, &document)
        }
        Write::Delete => tx.delete(collection, key),
    }
}

/// It parses a stored body into a [`Document`].
///
/// # Errors
///
/// Will return `Err` if the body is not a JSON object.
#[track_caller]
pub(crate) fn decode(collection: Collection, key: &str, body: &str) -> Result<Document, Error> {
    serde_json::from_str::<Document>(body).map_err(|err| Error::MalformedDocument {
        collection,
        key: key.to_owned(),
        err: std::sync::Arc::new(err),
        location: Location::caller(),
    })
}

/// It serializes a [`Document`] for storage.
pub(crate) fn encode(document: &Document) -> String {
    Value::Object(document.clone()).to_string()
}
