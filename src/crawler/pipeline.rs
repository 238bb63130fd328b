//! Pipeline - run every configured category in order
//!
//! Categories run one after another; each gets its own store handle, opened
//! right before the category starts and dropped as soon as it finishes. A
//! store that cannot be opened fails that category only.

use crate::config::{CategoryConfig, Config};
use crate::crawler::batch::BatchFetcher;
use crate::crawler::extractor::ProductExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::runner::{CategoryReport, CategoryRunner};
use crate::output::RunSummary;
use crate::storage::{ProductStore, StoreResult};
use std::time::Instant;

/// Sequential driver over the category table
pub struct Pipeline {
    base_url: String,
    categories: Vec<CategoryConfig>,
    batch: BatchFetcher,
    extractor: ProductExtractor,
}

impl Pipeline {
    pub fn new(
        base_url: impl Into<String>,
        categories: Vec<CategoryConfig>,
        batch: BatchFetcher,
        extractor: ProductExtractor,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            categories,
            batch,
            extractor,
        }
    }

    /// Builds the pipeline (HTTP client, headers, concurrency cap, selectors)
    /// from config
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let fetcher = PageFetcher::from_config(&config.http)?;
        let batch = BatchFetcher::new(fetcher, config.http.max_in_flight);
        Ok(Self::new(
            config.site.base_url.clone(),
            config.categories.clone(),
            batch,
            ProductExtractor::new()?,
        ))
    }

    /// Runs every category once
    ///
    /// # Arguments
    ///
    /// * `open_store` - Called once per category to obtain its store handle
    ///
    /// # Returns
    ///
    /// A summary with one report per category, in configuration order. The
    /// run itself never fails; failures are recorded in the reports.
    pub async fn run<S, F>(&self, mut open_store: F) -> RunSummary
    where
        S: ProductStore,
        F: FnMut() -> StoreResult<S>,
    {
        let start_time = Instant::now();
        let runner = CategoryRunner::new(&self.base_url, &self.batch, &self.extractor);
        let mut reports = Vec::with_capacity(self.categories.len());

        tracing::info!(
            "Starting run over {} categories ({} requests in flight max)",
            self.categories.len(),
            self.batch.max_in_flight()
        );

        for category in &self.categories {
            let report = match open_store() {
                Ok(mut store) => runner.run(category, &mut store).await,
                Err(e) => {
                    tracing::error!(
                        "Category '{}' skipped, store unavailable: {}",
                        category.name,
                        e
                    );
                    CategoryReport::store_unavailable(category, &e)
                }
            };
            debug_assert!(report.state.is_terminal());
            reports.push(report);
        }

        let summary = RunSummary::new(reports, start_time.elapsed());
        tracing::info!(
            "Run completed: {} categories done, {} failed, {} products persisted in {:?}",
            summary.done_count(),
            summary.failed_count(),
            summary.total_persisted(),
            summary.elapsed
        );

        summary
    }
}
