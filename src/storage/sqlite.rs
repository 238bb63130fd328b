//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ProductStore trait.

use crate::model::{ProductRecord, StoredProduct};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ProductStore, StoreError, StoreResult, UpsertOutcome};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite product store
pub struct SqliteProductStore {
    conn: Connection,
}

impl SqliteProductStore {
    /// Opens (or creates) the database and makes sure the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteProductStore)` - Store ready for upserts
    /// * `Err(StoreError::ConnectionFailure)` - Could not open the file or
    ///   create the schema
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::ConnectionFailure)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StoreError::ConnectionFailure)?;

        initialize_schema(&conn).map_err(StoreError::ConnectionFailure)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::ConnectionFailure)?;
        initialize_schema(&conn).map_err(StoreError::ConnectionFailure)?;
        Ok(Self { conn })
    }
}

impl ProductStore for SqliteProductStore {
    fn upsert(&mut self, record: &ProductRecord) -> StoreResult<UpsertOutcome> {
        let commit_failure = |source: rusqlite::Error| StoreError::CommitFailure {
            name: record.name.clone(),
            source,
        };

        let tx = self.conn.transaction().map_err(commit_failure)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM products
                 WHERE category = ?1 AND product_name = ?2 AND product_link = ?3 AND product_price = ?4
                 LIMIT 1",
                params![record.category, record.name, record.link, record.price],
                |row| row.get(0),
            )
            .optional()
            .map_err(commit_failure)?;

        let outcome = match existing {
            // Full overwrite even though the key guarantees identical values
            Some(id) => {
                tx.execute(
                    "UPDATE products SET category = ?1, product_name = ?2, product_link = ?3,
                     product_price = ?4 WHERE id = ?5",
                    params![record.category, record.name, record.link, record.price, id],
                )
                .map_err(commit_failure)?;
                UpsertOutcome::Updated(id)
            }
            None => {
                tx.execute(
                    "INSERT INTO products (category, product_name, product_link, product_price)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![record.category, record.name, record.link, record.price],
                )
                .map_err(commit_failure)?;
                UpsertOutcome::Inserted(tx.last_insert_rowid())
            }
        };

        tx.commit().map_err(commit_failure)?;

        Ok(outcome)
    }

    fn find(&self, record: &ProductRecord) -> StoreResult<Option<StoredProduct>> {
        let product = self
            .conn
            .query_row(
                "SELECT id, category, product_name, product_link, product_price FROM products
                 WHERE category = ?1 AND product_name = ?2 AND product_link = ?3 AND product_price = ?4
                 LIMIT 1",
                params![record.category, record.name, record.link, record.price],
                |row| {
                    Ok(StoredProduct {
                        id: row.get(0)?,
                        category: row.get(1)?,
                        name: row.get(2)?,
                        link: row.get(3)?,
                        price: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(product)
    }

    fn count_products(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM products GROUP BY category ORDER BY category",
        )?;

        let counts = stmt
            .query_map([], |row| {
                let category: Option<String> = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((category.unwrap_or_default(), count as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
