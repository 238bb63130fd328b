use crate::common::*;
use omarket_scraper::config::{CategoryConfig, Config, HttpConfig, OutputConfig, SiteConfig};
use omarket_scraper::crawler::{scrape, CategoryRunner, Pipeline, ProductExtractor};
use omarket_scraper::model::ProductRecord;
use omarket_scraper::state::CategoryState;
use omarket_scraper::storage::{ProductStore, SqliteProductStore, StoreError};
use std::cell::Cell;
use wiremock::{MockServer, ResponseTemplate};

const LOCKS_PATH: &str = "/zamki-dlya-noutbukov/";

fn laptop_locks(first_page: u32, last_page: u32) -> CategoryConfig {
    CategoryConfig::new("Laptop Locks", LOCKS_PATH, first_page, last_page)
}

#[tokio::test]
async fn test_single_page_category_upserts_every_product() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[
            product_html(
                "Kensington MicroSaver 2.0",
                "/catalog/kensington-microsaver/",
                "12 990\u{a0}тенге",
            ),
            product_html("Noble Wedge Lock", "/catalog/noble-wedge/", "1 234 567\u{a0}тенге"),
        ]),
    )
    .await;

    let batch = test_batch_fetcher();
    let extractor = ProductExtractor::new().unwrap();
    let base_url = mock_server.uri();
    let runner = CategoryRunner::new(&base_url, &batch, &extractor);
    let mut store = RecordingStore::default();

    let report = runner.run(&laptop_locks(1, 1), &mut store).await;

    assert_eq!(report.state, CategoryState::Done);
    assert_eq!(store.calls.len(), 2);
    assert_eq!(
        store.calls[0],
        ProductRecord::new(
            "Laptop Locks",
            "Kensington MicroSaver 2.0",
            "/catalog/kensington-microsaver/",
            12990.0
        )
    );
    assert_eq!(store.calls[1].price, 1234567.0);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.pages_fetched, 1);
}

#[tokio::test]
async fn test_failed_page_is_isolated() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[
            product_html("Lock A", "/a/", "1 000 тенге"),
            product_html("Lock B", "/b/", "2 000 тенге"),
        ]),
    )
    .await;
    mount_page_response(&mock_server, LOCKS_PATH, 2, ResponseTemplate::new(500)).await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        3,
        listing_page(&[product_html("Lock C", "/c/", "3 000 тенге")]),
    )
    .await;

    let batch = test_batch_fetcher();
    let extractor = ProductExtractor::new().unwrap();
    let base_url = mock_server.uri();
    let runner = CategoryRunner::new(&base_url, &batch, &extractor);
    let mut store = SqliteProductStore::new_in_memory().unwrap();

    let report = runner.run(&laptop_locks(1, 3), &mut store).await;

    assert_eq!(report.state, CategoryState::Done);
    assert_eq!(report.pages_requested, 3);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.inserted, 3);
    assert_eq!(store.count_products().unwrap(), 3);
    assert!(store
        .find(&ProductRecord::new("Laptop Locks", "Lock C", "/c/", 3000.0))
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_partial_containers_and_bad_prices_are_skipped() {
    let mock_server = MockServer::start().await;
    let missing_price = r#"<div class="productColText">
        <a class="name" href="/no-price/"><span class="middle">No price</span></a>
    </div>"#
        .to_string();

    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[
            product_html("Lock 1", "/1/", "100 тенге"),
            product_html("Lock 2", "/2/", "200 тенге"),
            missing_price,
            product_html("Lock 3", "/3/", "300 тенге"),
            product_html("Lock 4", "/4/", "400 тенге"),
            product_html("Lock 5", "/5/", "99,900тенге"),
        ]),
    )
    .await;

    let batch = test_batch_fetcher();
    let extractor = ProductExtractor::new().unwrap();
    let base_url = mock_server.uri();
    let runner = CategoryRunner::new(&base_url, &batch, &extractor);
    let mut store = RecordingStore::default();

    let report = runner.run(&laptop_locks(1, 1), &mut store).await;

    assert_eq!(report.state, CategoryState::Done);
    assert_eq!(report.containers, 6);
    assert_eq!(report.records_extracted, 4);
    assert_eq!(report.records_skipped, 2);
    assert_eq!(store.calls.len(), 4);
}

#[tokio::test]
async fn test_store_failure_does_not_stop_remaining_records() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[
            product_html("Lock A", "/a/", "1"),
            product_html("Broken", "/broken/", "2"),
            product_html("Lock C", "/c/", "3"),
        ]),
    )
    .await;

    let batch = test_batch_fetcher();
    let extractor = ProductExtractor::new().unwrap();
    let base_url = mock_server.uri();
    let runner = CategoryRunner::new(&base_url, &batch, &extractor);
    let mut store = RecordingStore::rejecting(&["Broken"]);

    let report = runner.run(&laptop_locks(1, 1), &mut store).await;

    assert_eq!(report.state, CategoryState::Done);
    assert_eq!(report.upsert_attempts(), 3);
    assert_eq!(report.store_failures, 1);
    assert_eq!(report.inserted, 2);
    assert_eq!(store.count_products().unwrap(), 2);
}

#[tokio::test]
async fn test_unreachable_site_fails_every_category_but_completes() {
    let batch = test_batch_fetcher();
    let pipeline = Pipeline::new(
        "http://127.0.0.1:1",
        vec![
            laptop_locks(1, 2),
            CategoryConfig::new("Laptop Bags", "/sumki/", 1, 1),
        ],
        batch,
        ProductExtractor::new().unwrap(),
    );

    let summary = pipeline.run(|| Ok(RecordingStore::default())).await;

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.failed_count(), 2);
    assert_eq!(summary.total_persisted(), 0);
    for report in &summary.reports {
        assert_eq!(report.state, CategoryState::Failed);
        assert_eq!(report.upsert_attempts(), 0);
        assert!(report.failure.as_ref().unwrap().contains("unreachable"));
    }
}

#[tokio::test]
async fn test_all_pages_http_errors_is_done_not_failed() {
    let mock_server = MockServer::start().await;
    mount_page_response(&mock_server, LOCKS_PATH, 1, ResponseTemplate::new(503)).await;
    mount_page_response(&mock_server, LOCKS_PATH, 2, ResponseTemplate::new(404)).await;

    let pipeline = Pipeline::new(
        mock_server.uri(),
        vec![laptop_locks(1, 2)],
        test_batch_fetcher(),
        ProductExtractor::new().unwrap(),
    );
    let summary = pipeline.run(|| Ok(RecordingStore::default())).await;

    let report = summary.report("Laptop Locks").unwrap();
    assert_eq!(report.state, CategoryState::Done);
    assert_eq!(report.pages_failed, 2);
    assert_eq!(report.persisted(), 0);
}

#[tokio::test]
async fn test_store_open_failure_only_fails_that_category() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[product_html("Lock", "/lock/", "500 тенге")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/sumki/",
        1,
        listing_page(&[product_html("Bag", "/bag/", "700 тенге")]),
    )
    .await;

    let pipeline = Pipeline::new(
        mock_server.uri(),
        vec![
            laptop_locks(1, 1),
            CategoryConfig::new("Laptop Bags", "/sumki/", 1, 1),
        ],
        test_batch_fetcher(),
        ProductExtractor::new().unwrap(),
    );

    let opened = Cell::new(0);
    let summary = pipeline
        .run(|| {
            opened.set(opened.get() + 1);
            if opened.get() == 1 {
                Err(StoreError::ConnectionFailure(rusqlite::Error::InvalidQuery))
            } else {
                Ok(RecordingStore::default())
            }
        })
        .await;

    assert_eq!(opened.get(), 2);
    assert_eq!(
        summary.report("Laptop Locks").unwrap().state,
        CategoryState::Failed
    );
    let bags = summary.report("Laptop Bags").unwrap();
    assert_eq!(bags.state, CategoryState::Done);
    assert_eq!(bags.inserted, 1);
}

#[tokio::test]
async fn test_scrape_twice_is_idempotent_on_disk() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        LOCKS_PATH,
        1,
        listing_page(&[
            product_html("Lock A", "/a/", "1 000 тенге"),
            product_html("Lock B", "/b/", "2 000 тенге"),
        ]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("products.db");

    let config = Config {
        site: SiteConfig {
            base_url: mock_server.uri(),
        },
        http: HttpConfig {
            max_in_flight: 2,
            ..test_http_config()
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().to_string(),
        },
        categories: vec![laptop_locks(1, 1)],
    };

    let first = scrape(&config).await.expect("First run should start");
    assert_eq!(first.done_count(), 1);
    assert_eq!(first.reports[0].inserted, 2);

    let second = scrape(&config).await.expect("Second run should start");
    assert_eq!(second.reports[0].inserted, 0);
    assert_eq!(second.reports[0].updated, 2);

    let store = SqliteProductStore::new(&db_path).unwrap();
    assert_eq!(store.count_products().unwrap(), 2);
    assert_eq!(
        store.count_by_category().unwrap(),
        vec![("Laptop Locks".to_string(), 2)]
    );
}
