//! Storage module for persisting scraped products
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Natural-key upserts of product records
//! - Per-category counts for the stats mode

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteProductStore;
pub use traits::{ProductStore, StoreError, StoreResult, UpsertOutcome};

use std::path::Path;

/// Opens the on-disk product store, creating the schema if missing
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_store(path: &Path) -> StoreResult<SqliteProductStore> {
    SqliteProductStore::new(path)
}
