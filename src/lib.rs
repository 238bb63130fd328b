//! omarket-scraper: a catalog scraper for paginated product listings
//!
//! This crate fetches the listing pages of a fixed set of catalog categories,
//! extracts product name/link/price triples from the HTML, and upserts them
//! into a SQLite product table keyed by the full record.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for scraper operations
///
/// Per-page, per-record and per-category failures are recovered inside the
/// pipeline; this type covers what can stop the process before it starts.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        selector: &'static str,
        message: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CategoryConfig, Config};
pub use model::{ProductRecord, StoredProduct};
pub use state::CategoryState;
