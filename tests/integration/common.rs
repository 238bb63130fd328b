//! Shared helpers for the integration tests

use omarket_scraper::config::HttpConfig;
use omarket_scraper::crawler::{BatchFetcher, PageFetcher};
use omarket_scraper::model::{ProductRecord, StoredProduct};
use omarket_scraper::storage::{ProductStore, StoreError, StoreResult, UpsertOutcome};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) TestBrowser/1.0";

pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        user_agent: TEST_USER_AGENT.to_string(),
        accept: "*/*".to_string(),
        timeout_secs: 2,
        max_in_flight: 4,
    }
}

pub fn test_batch_fetcher() -> BatchFetcher {
    let config = test_http_config();
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");
    BatchFetcher::new(fetcher, config.max_in_flight)
}

/// One product container as the catalog renders it
pub fn product_html(name: &str, link: &str, price: &str) -> String {
    format!(
        r#"<div class="productCol">
            <div class="productColText">
                <a class="name" href="{}"><span class="middle">{}</span></a>
                <div class="priceBlock"><a class="price">{}</a></div>
            </div>
        </div>"#,
        link, name, price
    )
}

pub fn listing_page(products: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Каталог</title></head>
        <body><div class="catalog">{}</div></body></html>"#,
        products.concat()
    )
}

pub fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Mounts a 200 HTML response for one page of a category
pub async fn mount_page(server: &MockServer, category_path: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(category_path))
        .and(query_param("PAGE", format!("page-{}", page)))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

/// Mounts an arbitrary response for one page of a category
pub async fn mount_page_response(
    server: &MockServer,
    category_path: &str,
    page: u32,
    response: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(category_path))
        .and(query_param("PAGE", format!("page-{}", page)))
        .respond_with(response)
        .mount(server)
        .await;
}

/// In-memory store that records every upsert call
///
/// Upserts for products named in `reject` fail with a commit error.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Vec<ProductRecord>,
    pub rows: Vec<StoredProduct>,
    pub reject: Vec<String>,
}

impl RecordingStore {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ProductStore for RecordingStore {
    fn upsert(&mut self, record: &ProductRecord) -> StoreResult<UpsertOutcome> {
        self.calls.push(record.clone());

        if self.reject.contains(&record.name) {
            return Err(StoreError::CommitFailure {
                name: record.name.clone(),
                source: rusqlite::Error::InvalidQuery,
            });
        }

        if let Some(row) = self.rows.iter_mut().find(|row| row.matches(record)) {
            row.category = record.category.clone();
            row.name = record.name.clone();
            row.link = record.link.clone();
            row.price = record.price;
            return Ok(UpsertOutcome::Updated(row.id));
        }

        let id = self.rows.len() as i64 + 1;
        self.rows.push(StoredProduct {
            id,
            category: record.category.clone(),
            name: record.name.clone(),
            link: record.link.clone(),
            price: record.price,
        });
        Ok(UpsertOutcome::Inserted(id))
    }

    fn find(&self, record: &ProductRecord) -> StoreResult<Option<StoredProduct>> {
        Ok(self.rows.iter().find(|row| row.matches(record)).cloned())
    }

    fn count_products(&self) -> StoreResult<u64> {
        Ok(self.rows.len() as u64)
    }

    fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        for row in &self.rows {
            match counts.iter_mut().find(|(c, _)| *c == row.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((row.category.clone(), 1)),
            }
        }
        counts.sort();
        Ok(counts)
    }
}
