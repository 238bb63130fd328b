//! Storage traits and error types
//!
//! This module defines the trait interface for product stores and the
//! associated error types.

use crate::model::{ProductRecord, StoredProduct};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or its schema could not be created
    #[error("Failed to open product store: {0}")]
    ConnectionFailure(#[source] rusqlite::Error),

    /// An upsert's lookup, write or commit failed; nothing was persisted
    #[error("Failed to commit product '{name}': {source}")]
    CommitFailure {
        name: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A read-only query failed
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was created with this id
    Inserted(i64),

    /// An existing row with the same natural key was overwritten
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => *id,
        }
    }
}

/// Trait for product store implementations
///
/// The natural key of a product is the full (category, name, link, price)
/// tuple. Implementations must never hold two rows with the same key.
pub trait ProductStore {
    /// Inserts the record, or overwrites the row that already has its
    /// natural key
    ///
    /// Each call commits on its own; a failure leaves earlier calls intact.
    fn upsert(&mut self, record: &ProductRecord) -> StoreResult<UpsertOutcome>;

    /// Looks up the row holding exactly this natural key
    fn find(&self, record: &ProductRecord) -> StoreResult<Option<StoredProduct>>;

    /// Counts all stored products
    fn count_products(&self) -> StoreResult<u64>;

    /// Counts stored products per category, sorted by category name
    fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>>;
}
