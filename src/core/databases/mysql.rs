//! The `MySQL` database driver.
use campus_quest_configuration::DatabaseDriver;
use r2d2::Pool;
use r2d2_mysql::mysql::prelude::Queryable;
use r2d2_mysql::mysql::{params, Opts, OptsBuilder, TxOpts};
use r2d2_mysql::MySqlConnectionManager;

use super::{decode, encode, Collection, Database, Document, Error, Outcome, Transaction};

const DRIVER: DatabaseDriver = DatabaseDriver::MySQL;

pub struct Mysql {
    pool: Pool<MySqlConnectionManager>,
}

impl Database for Mysql {
    /// It instantiates a new `MySQL` database driver.
    ///
    /// Refer to [`databases::Database::new`](crate::core::databases::Database::new).
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create `MySQL` database.
    fn new(db_path: &str) -> Result<Self, Error> {
        let opts = Opts::from_url(db_path)?;
        let builder = OptsBuilder::from_opts(opts);
        let manager = MySqlConnectionManager::new(builder);
        let pool = r2d2::Pool::builder().build(manager).map_err(|e| (e, DRIVER))?;

        Ok(Self { pool })
    }

    /// Refer to [`databases::Database::create_database_tables`](crate::core::databases::Database::create_database_tables).
    fn create_database_tables(&self) -> Result<(), Error> {
        let create_documents_table = "
        CREATE TABLE IF NOT EXISTS documents (
          `collection` VARCHAR(64) NOT NULL,
          `key` VARCHAR(128) NOT NULL,
          `body` JSON NOT NULL,
          PRIMARY KEY (`collection`, `key`)
        );"
        .to_string();

        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.query_drop(&create_documents_table)?;

        Ok(())
    }

    /// Refer to [`databases::Database::drop_database_tables`](crate::core::databases::Database::drop_database_tables).
    fn drop_database_tables(&self) -> Result<(), Error> {
        let drop_documents_table = "
        DROP TABLE `documents`;"
            .to_string();

        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.query_drop(&drop_documents_table)?;

        Ok(())
    }

    /// Refer to [`databases::Database::get`](crate::core::databases::Database::get).
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Document>, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        get(&mut *conn, collection, key, false)
    }

    /// Refer to [`databases::Database::set`](crate::core::databases::Database::set).
    fn set(&self, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        set(&mut *conn, collection, key, document)
    }

    /// Refer to [`databases::Database::delete`](crate::core::databases::Database::delete).
    fn delete(&self, collection: Collection, key: &str) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        delete(&mut *conn, collection, key)
    }

    /// Refer to [`databases::Database::list`](crate::core::databases::Database::list).
    fn list(&self, collection: Collection) -> Result<Vec<(String, Document)>, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let rows = conn.exec_map(
            "SELECT `key`, CAST(body AS CHAR) FROM documents WHERE collection = :collection",
            params! { "collection" => collection.as_str() },
            |(key, body): (String, String)| (key, body),
        )?;

        decode_rows(collection, rows)
    }

    /// Refer to [`databases::Database::query_array_contains`](crate::core::databases::Database::query_array_contains).
    fn query_array_contains(&self, collection: Collection, field: &str, value: &str) -> Result<Vec<(String, Document)>, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let rows = conn.exec_map(
            "SELECT `key`, CAST(body AS CHAR) FROM documents
             WHERE collection = :collection AND JSON_CONTAINS(body, JSON_QUOTE(:value), :path)",
            params! { "collection" => collection.as_str(), "value" => value, "path" => format!("$.{field}") },
            |(key, body): (String, String)| (key, body),
        )?;

        decode_rows(collection, rows)
    }

    /// Refer to [`databases::Database::run_transaction`](crate::core::databases::Database::run_transaction).
    ///
    /// Documents read inside the transaction are locked with `FOR UPDATE`
    /// until it ends.
    fn run_transaction(&self, body: &mut dyn FnMut(&mut dyn Transaction) -> Outcome) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut tx = conn.start_transaction(TxOpts::default())?;

        let outcome = body(&mut MysqlTransaction { tx: &mut tx });

        match outcome {
            Outcome::Commit => tx.commit()?,
            Outcome::Rollback => tx.rollback()?,
        }

        Ok(())
    }
}

struct MysqlTransaction<'t, 'c> {
    tx: &'t mut r2d2_mysql::mysql::Transaction<'c>,
}

impl Transaction for MysqlTransaction<'_, '_> {
    fn get(&mut self, collection: Collection, key: &str) -> Result<Option<Document>, Error> {
        get(&mut *self.tx, collection, key, true)
    }

    fn set(&mut self, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
        set(&mut *self.tx, collection, key, document)
    }

    fn delete(&mut self, collection: Collection, key: &str) -> Result<(), Error> {
        delete(&mut *self.tx, collection, key)
    }
}

fn get<Q: Queryable>(conn: &mut Q, collection: Collection, key: &str, for_update: bool) -> Result<Option<Document>, Error> {
    let query = if for_update {
        "SELECT CAST(body AS CHAR) FROM documents WHERE collection = :collection AND `key` = :key FOR UPDATE"
    } else {
        "SELECT CAST(body AS CHAR) FROM documents WHERE collection = :collection AND `key` = :key"
    };

    let body = conn.exec_first::<String, _, _>(query, params! { "collection" => collection.as_str(), "key" => key })?;

    body.map(|body| decode(collection, key, &body)).transpose()
}

fn set<Q: Queryable>(conn: &mut Q, collection: Collection, key: &str, document: &Document) -> Result<(), Error> {
    conn.exec_drop(
        "INSERT INTO documents (collection, `key`, body) VALUES (:collection, :key, :body)
         ON DUPLICATE KEY UPDATE body = VALUES(body)",
        params! { "collection" => collection.as_str(), "key" => key, "body" => encode(document) },
    )?;

    Ok(())
}

fn delete<Q: Queryable>(conn: &mut Q, collection: Collection, key: &str) -> Result<(), Error> {
    conn.exec_drop(
        "DELETE FROM documents WHERE collection = :collection AND `key` = :key",
        params! { "collection" => collection.as_str(), "key" => key },
    )?;

    Ok(())
}

fn decode_rows(collection: Collection, rows: Vec<(String, String)>) -> Result<Vec<(String, Document)>, Error> {
    rows.into_iter()
        .map(|(key, body)| decode(collection, &key, &body).map(|document| (key, document)))
        .collect()
}
