//! The `SQLite3` database driver.
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use campus_quest_configuration::DatabaseDriver;
use r2d2::Pool;
use r2d2_sqlite::rusqlite::{params, Connection, TransactionBehavior};
use r2d2_sqlite::SqliteConnectionManager;

use super::{decode, encode, Collection, Database, Document, Error, Outcome, Transaction};

const DRIVER: DatabaseDriver = DatabaseDriver::Sqlite3;

/// How long a connection waits for the write lock held by another transaction.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Sqlite {
    pool: Pool<SqliteConnectionManager>,
}

impl Database for Sqlite {
    /// It instantiates a new `SQLite3` database driver.
    ///
    /// Refer to [`databases::Database::new`](crate::core::databases::Database::new).
    ///
    /// # Errors
    ///
    /// Will return `Error::ConnectionError` if the parent directory of
    /// `db_path` can't be created, or `r2d2::Error` if `db_path` is not able
    /// to create `SqLite` database.
    fn new(db_path: &str) -> Result<Sqlite, Error> {
        if let Some(parent) = Path::new(db_path).parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| Error::ConnectionError {
                err: Arc::new(err),
                driver: DRIVER,
                location: Location::caller(),
            })?;
        }

        let cm = SqliteConnectionManager::file(db_path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        Pool::new(cm).map_or_else(|err| Err((err, DRIVER).into()), |pool| Ok(Sqlite { pool }))
    }

    /// Refer to [`databases::Database::create_database_tables`](crate::core::databases::Database::create_database_tables).
    fn create_database_tables(&self) -> Result<(), Error> {
        let create_documents_table = "
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            key TEXT NOT NULL,
            body TEXT NOT NULL,
            PRIMARY KEY (collection, key)
        );"
        .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&create_documents_table, [])?;

        Ok(())
    }

    /// Refer to [`databases::Database::drop_database_tables`](crate::core::databases::Database::drop_database_tables).
    fn drop_database_tables(&self) -> Result<(), Error> {
        let drop_documents_table = "
        DROP TABLE documents;"
            .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&drop_documents_table, [])?;

        Ok(())
    }

    /// Refer to [`databases::Database::get`](crate::core::databases::Database::get).
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Document>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        get(&conn, collection, key)
    }

    /// Refer to [`databases::Database::set`](crate::core::databases::Database::set).
    fn set(&self, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        set(&conn, collection, key, document)
    }

    /// Refer to [`databases::Database::delete`](crate::core::databases::Database::delete).
    fn delete(&self, collection: Collection, key: &str) -> Result<(), Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        delete(&conn, collection, key)
    }

    /// Refer to [`databases::Database::list`](crate::core::databases::Database::list).
    fn list(&self, collection: Collection) -> Result<Vec<(String, Document)>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut stmt = conn.prepare("SELECT key, body FROM documents WHERE collection = ?1")?;

        let rows = stmt.query_map(params![collection.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        decode_rows(collection, rows)
    }

    /// Refer to [`databases::Database::query_array_contains`](crate::core::databases::Database::query_array_contains).
    fn query_array_contains(&self, collection: Collection, field: &str, value: &str) -> Result<Vec<(String, Document)>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut stmt = conn.prepare(
            "SELECT key, body FROM documents WHERE collection = ?1 AND EXISTS (
                SELECT 1 FROM json_each(documents.body, ?2) WHERE json_each.value = ?3
            )",
        )?;

        let rows = stmt.query_map(params![collection.as_str(), format!("$.{field}"), value], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        decode_rows(collection, rows)
    }

    /// Refer to [`databases::Database::run_transaction`](crate::core::databases::Database::run_transaction).
    ///
    /// The transaction takes the write lock when it begins, so concurrent
    /// transactions run one after the other.
    fn run_transaction(&self, body: &mut dyn FnMut(&mut dyn Transaction) -> Outcome) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = body(&mut SqliteTransaction { conn: &tx });

        match outcome {
            Outcome::Commit => tx.commit()?,
            Outcome::Rollback => tx.rollback()?,
        }

        Ok(())
    }
}

struct SqliteTransaction<'c> {
    conn: &'c Connection,
}

impl Transaction for SqliteTransaction<'_> {
    fn get(&mut self, collection: Collection, key: &str) -> Result<Option<Document>, Error> {
        get(self.conn, collection, key)
    }

    fn set(&mut self, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
        set(self.conn, collection, key, document)
    }

    fn delete(&mut self, collection: Collection, key: &str) -> Result<(), Error> {
        delete(self.conn, collection, key)
    }
}

fn get(conn: &Connection, collection: Collection, key: &str) -> Result<Option<Document>, Error> {
    let mut stmt = conn.prepare("SELECT body FROM documents WHERE collection = ?1 AND key = ?2")?;

    let mut rows = stmt.query(params![collection.as_str(), key])?;

    match rows.next()? {
        Some(row) => {
            let body: String = row.get(0)?;
            Ok(Some(decode(collection, key, &body)?))
        }
        None => Ok(None),
    }
}

fn set(conn: &Connection, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO documents (collection, key, body) VALUES (?1, ?2, ?3)
         ON CONFLICT(collection, key) DO UPDATE SET body = excluded.body",
        params![collection.as_str(), key, encode(document)],
    )?;

    Ok(())
}

fn delete(conn: &Connection, collection: Collection, key: &str) -> Result<(), Error> {
    conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
        params![collection.as_str(), key],
    )?;

    Ok(())
}

fn decode_rows<I>(collection: Collection, rows: I) -> Result<Vec<(String, Document)>, Error>
where
    I: Iterator<Item = Result<(String, String), r2d2_sqlite::rusqlite::Error>>,
{
    let mut documents = vec![];

    for row in rows {
        let (key, body) = row?;
        let document = decode(collection, &key, &body)?;
        documents.push((key, document));
    }

    Ok(documents)
}
