//! Concurrent fetching of a category's page range
//!
//! Every page of the range is requested with at most `max_in_flight`
//! requests outstanding. Failures stay attached to their page and never
//! cancel siblings; the batch resolves once every page has.

use crate::crawler::fetcher::{FetchError, PageFetcher};
use futures::stream::{self, StreamExt};

/// Outcome of fetching one page of a range
#[derive(Debug)]
pub struct PageFetch {
    /// Page number this result belongs to
    pub page: u32,

    /// HTML body, or why it could not be fetched
    pub result: Result<String, FetchError>,
}

impl PageFetch {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builds the query path of one listing page
///
/// # Example
///
/// ```
/// use omarket_scraper::crawler::page_path;
///
/// assert_eq!(page_path("/noutbuki/", 3), "/noutbuki/?PAGE=page-3");
/// ```
pub fn page_path(category_path: &str, page: u32) -> String {
    format!("{}?PAGE=page-{}", category_path, page)
}

/// Drives a PageFetcher over a whole page range
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    fetcher: PageFetcher,
    max_in_flight: usize,
}

impl BatchFetcher {
    /// Creates a batch fetcher; `max_in_flight` is clamped to at least 1
    pub fn new(fetcher: PageFetcher, max_in_flight: usize) -> Self {
        Self {
            fetcher,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Fetches pages `first_page..=last_page` of one category
    ///
    /// # Returns
    ///
    /// One `PageFetch` per page, `last_page - first_page + 1` entries in
    /// ascending page order whatever order the responses arrived in. An
    /// inverted range yields an empty vector.
    pub async fn fetch_range(
        &self,
        base_url: &str,
        category_path: &str,
        first_page: u32,
        last_page: u32,
    ) -> Vec<PageFetch> {
        let pages: Vec<u32> = (first_page..=last_page).collect();
        let mut slots: Vec<Option<PageFetch>> = pages.iter().map(|_| None).collect();

        let mut in_flight = stream::iter(pages.into_iter().enumerate())
            .map(|(slot, page)| async move {
                let path = page_path(category_path, page);
                tracing::debug!("Fetching page {} ({}{})", page, base_url, path);
                let result = self.fetcher.fetch(base_url, &path).await;
                (slot, PageFetch { page, result })
            })
            .buffer_unordered(self.max_in_flight);

        while let Some((slot, fetched)) = in_flight.next().await {
            slots[slot] = Some(fetched);
        }

        // buffer_unordered yields every future exactly once
        slots.into_iter().flatten().collect()
    }
}
