//! Product records as extracted from listing pages and as stored

/// One product listing extracted from a catalog page
///
/// The whole tuple is the natural key: two records are the same logical
/// product only when category, name, link and price all match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// Display name of the category the page belongs to
    pub category: String,

    /// Product name, trimmed
    pub name: String,

    /// Anchor href exactly as it appeared on the page
    pub link: String,

    /// Normalized price, always finite and >= 0
    pub price: f64,
}

impl ProductRecord {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        link: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            link: link.into(),
            price,
        }
    }
}

/// A product row as persisted, with the store-assigned surrogate id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub link: String,
    pub price: f64,
}

impl StoredProduct {
    /// Returns true if this row holds exactly the given natural key
    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.category == record.category
            && self.name == record.name
            && self.link == record.link
            && self.price == record.price
    }
}
