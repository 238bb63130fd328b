//! Category runner - fetch, extract and persist one category
//!
//! A category moves `Idle -> Fetching -> Extracting -> Persisting -> Done`.
//! It ends in `Failed` only when every page failed at the transport level
//! (the site could not be reached at all) or when its store could not be
//! opened. HTTP-level page failures, bad records and store write failures
//! are logged and counted, never fatal.

use crate::config::CategoryConfig;
use crate::crawler::batch::{page_path, BatchFetcher, PageFetch};
use crate::crawler::extractor::ProductExtractor;
use crate::model::ProductRecord;
use crate::state::CategoryState;
use crate::storage::{ProductStore, StoreError, UpsertOutcome};

/// What happened to one category during a run
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// Category display name
    pub category: String,

    /// Final (or current) state of the category
    pub state: CategoryState,

    /// Pages in the configured range
    pub pages_requested: usize,

    /// Pages that returned an HTML body
    pub pages_fetched: usize,

    /// Pages that failed to fetch
    pub pages_failed: usize,

    /// Product containers seen across all fetched pages
    pub containers: usize,

    /// Records produced by the extractor
    pub records_extracted: usize,

    /// Containers that produced no record (missing field or bad price)
    pub records_skipped: usize,

    /// Upserts that created a new row
    pub inserted: usize,

    /// Upserts that overwrote an existing row
    pub updated: usize,

    /// Upserts that failed
    pub store_failures: usize,

    /// Why the category failed, if it did
    pub failure: Option<String>,
}

impl CategoryReport {
    pub fn new(category: &CategoryConfig) -> Self {
        Self {
            category: category.name.clone(),
            state: CategoryState::Idle,
            pages_requested: category.page_count(),
            pages_fetched: 0,
            pages_failed: 0,
            containers: 0,
            records_extracted: 0,
            records_skipped: 0,
            inserted: 0,
            updated: 0,
            store_failures: 0,
            failure: None,
        }
    }

    /// Report for a category whose store could not be opened
    pub fn store_unavailable(category: &CategoryConfig, error: &StoreError) -> Self {
        let mut report = Self::new(category);
        report.fail(error.to_string());
        report
    }

    /// Number of records that reached the store
    pub fn persisted(&self) -> usize {
        self.inserted + self.updated
    }

    /// Number of upserts attempted
    pub fn upsert_attempts(&self) -> usize {
        self.persisted() + self.store_failures
    }

    fn advance(&mut self, next: CategoryState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal category transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.category, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, reason: String) {
        self.advance(CategoryState::Failed);
        self.failure = Some(reason);
    }
}

/// Runs the fetch/extract/persist cycle for one category
pub struct CategoryRunner<'a> {
    base_url: &'a str,
    batch: &'a BatchFetcher,
    extractor: &'a ProductExtractor,
}

impl<'a> CategoryRunner<'a> {
    pub fn new(
        base_url: &'a str,
        batch: &'a BatchFetcher,
        extractor: &'a ProductExtractor,
    ) -> Self {
        Self {
            base_url,
            batch,
            extractor,
        }
    }

    /// Runs one category to `Done` or `Failed`
    ///
    /// The whole page batch resolves before any page is parsed; records are
    /// then upserted in page order.
    pub async fn run<S>(&self, category: &CategoryConfig, store: &mut S) -> CategoryReport
    where
        S: ProductStore + ?Sized,
    {
        let mut report = CategoryReport::new(category);
        tracing::info!(
            "Category '{}': fetching pages {}..={}",
            category.name,
            category.first_page,
            category.last_page
        );

        report.advance(CategoryState::Fetching);
        let pages = self
            .batch
            .fetch_range(
                self.base_url,
                &category.url_path,
                category.first_page,
                category.last_page,
            )
            .await;

        report.pages_fetched = pages.iter().filter(|p| p.is_ok()).count();
        report.pages_failed = pages.len() - report.pages_fetched;

        if let Some(reason) = total_transport_failure(&pages) {
            tracing::error!("Category '{}' failed: {}", category.name, reason);
            report.fail(reason);
            return report;
        }

        report.advance(CategoryState::Extracting);
        let records = self.extract_pages(category, &pages, &mut report);

        report.advance(CategoryState::Persisting);
        persist(&records, store, &mut report);

        report.advance(CategoryState::Done);
        tracing::info!(
            "Category '{}' done: {}/{} pages, {} records, {} inserted, {} updated, {} store failures",
            category.name,
            report.pages_fetched,
            report.pages_requested,
            report.records_extracted,
            report.inserted,
            report.updated,
            report.store_failures
        );

        report
    }

    fn extract_pages(
        &self,
        category: &CategoryConfig,
        pages: &[PageFetch],
        report: &mut CategoryReport,
    ) -> Vec<ProductRecord> {
        let mut records = Vec::new();

        for page in pages {
            let body = match &page.result {
                Ok(body) => body,
                Err(e) => {
                    match e.status() {
                        Some(status) => tracing::warn!(
                            "Category '{}': page {} answered HTTP {} ({}), no products taken",
                            category.name,
                            page.page,
                            status,
                            e.url()
                        ),
                        None => tracing::warn!(
                            "Category '{}': page {} failed: {}",
                            category.name,
                            page.page,
                            e
                        ),
                    }
                    continue;
                }
            };

            let source = format!(
                "{}{}",
                self.base_url,
                page_path(&category.url_path, page.page)
            );
            let extraction = self.extractor.extract(body, &category.name, &source);

            report.containers += extraction.containers;
            report.records_skipped += extraction.errors.len();
            records.extend(extraction.records);
        }

        report.records_extracted = records.len();
        records
    }
}

/// Upserts every record; a failed upsert is logged and the rest continue
fn persist<S>(records: &[ProductRecord], store: &mut S, report: &mut CategoryReport)
where
    S: ProductStore + ?Sized,
{
    for record in records {
        match store.upsert(record) {
            Ok(UpsertOutcome::Inserted(_)) => report.inserted += 1,
            Ok(UpsertOutcome::Updated(_)) => report.updated += 1,
            Err(e) => {
                tracing::warn!("Category '{}': {}", record.category, e);
                report.store_failures += 1;
            }
        }
    }
}

/// Returns a failure reason if no page got an HTTP answer at all
fn total_transport_failure(pages: &[PageFetch]) -> Option<String> {
    if pages.is_empty() {
        return None;
    }

    let all_transport = pages
        .iter()
        .all(|p| matches!(&p.result, Err(e) if e.is_transport()));

    if !all_transport {
        return None;
    }

    let first = pages.iter().find_map(|p| p.result.as_ref().err())?;
    Some(format!(
        "all {} pages unreachable (first error: {})",
        pages.len(),
        first
    ))
}
