//! Product extraction from listing pages
//!
//! This module turns one listing page into product records:
//! - Locating product containers (`div.productColText`)
//! - Picking the name, link and price fields inside each container
//! - Normalizing price text such as `1 234 567 тенге` into a number
//!
//! Malformed-but-parseable HTML never fails the page. Containers missing a
//! field and prices that do not parse are skipped and reported.

use crate::model::ProductRecord;
use crate::ScraperError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const CONTAINER_SELECTOR: &str = "div.productColText";
const NAME_SELECTOR: &str = "span.middle";
const LINK_SELECTOR: &str = "a.name";
const PRICE_SELECTOR: &str = "a.price";

/// Currency words that may trail a price
const CURRENCY_SUFFIXES: [&str; 2] = ["тенге", "₸"];

/// Why a single container produced no record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("Product container is missing its {0} field")]
    MissingField(ProductField),

    #[error("Could not parse price '{raw}'")]
    PriceParseFailure { raw: String },
}

/// The three fields every product container must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Link,
    Price,
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Link => "link",
            Self::Price => "price",
        };
        write!(f, "{}", name)
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// Number of product containers found
    pub containers: usize,

    /// Records built from complete containers, in document order
    pub records: Vec<ProductRecord>,

    /// One entry per container that produced no record
    pub errors: Vec<ExtractionError>,
}

impl PageExtraction {
    pub fn missing_field_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, ExtractionError::MissingField(_)))
            .count()
    }
}

/// Parses listing pages into product records
pub struct ProductExtractor {
    container: Selector,
    name: Selector,
    link: Selector,
    price: Selector,
}

impl ProductExtractor {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            container: parse_selector(CONTAINER_SELECTOR)?,
            name: parse_selector(NAME_SELECTOR)?,
            link: parse_selector(LINK_SELECTOR)?,
            price: parse_selector(PRICE_SELECTOR)?,
        })
    }

    /// Extracts every complete product listing from `html`
    ///
    /// # Arguments
    ///
    /// * `html` - Page body
    /// * `category` - Category name stamped on each record
    /// * `source` - Page label used in diagnostics (usually its URL)
    pub fn extract(&self, html: &str, category: &str, source: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        let mut extraction = PageExtraction::default();

        for container in document.select(&self.container) {
            extraction.containers += 1;

            match self.extract_one(container, category) {
                Ok(record) => extraction.records.push(record),
                Err(e) => {
                    if let ExtractionError::PriceParseFailure { raw } = &e {
                        tracing::warn!(
                            "Skipping product on {}: unparseable price '{}'",
                            source,
                            raw
                        );
                    }
                    extraction.errors.push(e);
                }
            }
        }

        if extraction.containers == 0 {
            tracing::warn!("No products found on {}", source);
        } else {
            let missing = extraction.missing_field_count();
            if missing > 0 {
                tracing::warn!(
                    "{} of {} product containers on {} were missing fields",
                    missing,
                    extraction.containers,
                    source
                );
            }
        }

        extraction
    }

    fn extract_one(
        &self,
        container: ElementRef<'_>,
        category: &str,
    ) -> Result<ProductRecord, ExtractionError> {
        let name = container
            .select(&self.name)
            .next()
            .ok_or(ExtractionError::MissingField(ProductField::Name))?;
        let link = container
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(ExtractionError::MissingField(ProductField::Link))?;
        let price = container
            .select(&self.price)
            .next()
            .ok_or(ExtractionError::MissingField(ProductField::Price))?;

        let price_text = price.text().collect::<String>();
        let price = normalize_price(&price_text)?;

        Ok(ProductRecord::new(
            category,
            name.text().collect::<String>().trim(),
            link.trim(),
            price,
        ))
    }
}

fn parse_selector(selector: &'static str) -> crate::Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector,
        message: format!("{:?}", e),
    })
}

/// Normalizes displayed price text into a number
///
/// All whitespace (non-breaking spaces and newlines included) is removed,
/// then a trailing currency word, then the rest must parse as a finite,
/// non-negative decimal.
///
/// # Example
///
/// ```
/// use omarket_scraper::crawler::normalize_price;
///
/// assert_eq!(normalize_price("1 234 567\u{a0}тенге").unwrap(), 1234567.0);
/// assert!(normalize_price("99,900тенге").is_err());
/// ```
pub fn normalize_price(raw: &str) -> Result<f64, ExtractionError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let number = CURRENCY_SUFFIXES
        .iter()
        .find_map(|suffix| compact.strip_suffix(suffix))
        .unwrap_or(&compact);

    let failure = || ExtractionError::PriceParseFailure {
        raw: raw.trim().to_string(),
    };

    match number.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(failure()),
    }
}
