//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of single listing pages
//! - Bounded concurrent fetching of a category's page range
//! - Product extraction and price normalization
//! - Per-category orchestration and the sequential run over all categories

mod batch;
mod extractor;
mod fetcher;
mod pipeline;
mod runner;

pub use batch::{page_path, BatchFetcher, PageFetch};
pub use extractor::{
    normalize_price, ExtractionError, PageExtraction, ProductExtractor, ProductField,
};
pub use fetcher::{build_headers, build_http_client, FetchError, PageFetcher};
pub use pipeline::Pipeline;
pub use runner::{CategoryReport, CategoryRunner};

use crate::config::Config;
use crate::output::RunSummary;
use crate::storage::SqliteProductStore;
use std::path::PathBuf;

/// Runs a complete scrape against the configured SQLite database
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client and header set
/// 2. For every category in order, open the store, fetch the page range,
///    extract products and upsert them
/// 3. Return a summary of what happened per category
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed (individual categories may have failed)
/// * `Err(ScraperError)` - The HTTP client or extractor could not be built
pub async fn scrape(config: &Config) -> crate::Result<RunSummary> {
    let pipeline = Pipeline::from_config(config)?;
    let database_path = PathBuf::from(&config.output.database_path);

    Ok(pipeline
        .run(|| SqliteProductStore::new(&database_path))
        .await)
}
