use serde::Deserialize;

/// Default catalog root the category paths are appended to
pub const DEFAULT_BASE_URL: &str = "https://omarket.kz/catalog/ecc_kompyutery/ecc_noutbuk";

/// Browser-like user agent; the target rejects default client identifiers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str = "*/*";

/// Main configuration structure
///
/// Every section is optional; an empty file yields the reference deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default = "default_categories", rename = "category")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            http: HttpConfig::default(),
            output: OutputConfig::default(),
            categories: default_categories(),
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Catalog root; page URLs are `base-url + url-path + ?PAGE=page-N`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Outbound request configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept header sent with every page request
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of page requests in flight within one category
    #[serde(rename = "max-in-flight", default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            timeout_secs: default_timeout_secs(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// One catalog segment and the page range to fetch for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryConfig {
    /// Display name, stored in the `category` column
    pub name: String,

    /// Path appended to the base URL, e.g. `/noutbuki/`
    #[serde(rename = "url-path")]
    pub url_path: String,

    /// First page number, >= 1
    #[serde(rename = "first-page")]
    pub first_page: u32,

    /// Last page number, >= first-page
    #[serde(rename = "last-page")]
    pub last_page: u32,
}

impl CategoryConfig {
    pub fn new(name: &str, url_path: &str, first_page: u32, last_page: u32) -> Self {
        Self {
            name: name.to_string(),
            url_path: url_path.to_string(),
            first_page,
            last_page,
        }
    }

    /// Number of pages in the inclusive range
    pub fn page_count(&self) -> usize {
        self.last_page.saturating_sub(self.first_page) as usize + 1
    }
}

/// The eight laptop-accessory categories of the reference deployment
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("Laptop Batteries", "/laptop-batteries/", 1, 13),
        CategoryConfig::new("Laptop Power Supplies", "/power-supplies-for-laptops/", 1, 21),
        CategoryConfig::new("Laptop Doc Stations", "/dok-stantsii-dlya-noutbukov/", 1, 9),
        CategoryConfig::new("Laptop Locks", "/zamki-dlya-noutbukov/", 1, 1),
        CategoryConfig::new("Laptop Matrices", "/matritsy-dlya-noutbukov/", 1, 1),
        CategoryConfig::new("Laptops", "/noutbuki/", 1, 249),
        CategoryConfig::new("Laptop Stands", "/podstavki_dlya_noutbuka/", 1, 8),
        CategoryConfig::new("Laptop Bags", "/sumki_dlya_noutbukov/", 1, 83),
    ]
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_in_flight() -> usize {
    10
}

fn default_database_path() -> String {
    "products.db".to_string()
}
