//! HTTP page fetcher
//!
//! This module issues the single GET behind every listing page:
//! - Building the HTTP client with the configured timeout
//! - Sending the fixed Accept/User-Agent header set
//! - Classifying non-200, non-HTML and transport failures
//!
//! There is no retry here; each call is exactly one attempt.

use crate::config::HttpConfig;
use crate::ScraperError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200
    #[error("Unexpected status {status} for {url}")]
    BadStatus {
        url: String,
        status: u16,
        content_type: Option<String>,
    },

    /// The server answered 200 with a non-HTML body
    #[error("Expected HTML from {url}, got content type '{content_type}'")]
    WrongContentType {
        url: String,
        status: u16,
        content_type: String,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// DNS, connect, TLS or mid-body transport failure
    #[error("Connection failed for {url}: {message}")]
    ConnectionFailed { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::BadStatus { url, .. }
            | Self::WrongContentType { url, .. }
            | Self::Timeout { url }
            | Self::ConnectionFailed { url, .. } => url,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } | Self::WrongContentType { status, .. } => {
                Some(*status)
            }
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => None,
        }
    }

    /// Returns true if the request never got an HTTP answer
    ///
    /// A batch made only of these failures means the site itself is
    /// unreachable.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::ConnectionFailed { .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::ConnectionFailed {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Builds the HTTP client shared by every page request
///
/// # Arguments
///
/// * `config` - Outbound request configuration (timeout is taken from it)
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the fixed header set sent with every page request
pub fn build_headers(config: &HttpConfig) -> crate::Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let accept = HeaderValue::from_str(&config.accept).map_err(|e| ScraperError::InvalidHeader {
        name: "accept",
        message: e.to_string(),
    })?;
    let user_agent =
        HeaderValue::from_str(&config.user_agent).map_err(|e| ScraperError::InvalidHeader {
            name: "user-agent",
            message: e.to_string(),
        })?;

    headers.insert(ACCEPT, accept);
    headers.insert(USER_AGENT, user_agent);

    Ok(headers)
}

/// Fetches one page as an HTML document body
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    headers: HeaderMap,
}

impl PageFetcher {
    /// Creates a fetcher from an existing client and header set
    pub fn new(client: Client, headers: HeaderMap) -> Self {
        Self { client, headers }
    }

    /// Creates a fetcher from configuration
    pub fn from_config(config: &HttpConfig) -> crate::Result<Self> {
        let client = build_http_client(config)?;
        let headers = build_headers(config)?;
        Ok(Self::new(client, headers))
    }

    /// Fetches `base_url + page_path`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of a 200 response with an HTML content type
    /// * `Err(FetchError)` - Any other outcome
    pub async fn fetch(&self, base_url: &str, page_path: &str) -> Result<String, FetchError> {
        let url = format!("{}{}", base_url, page_path);

        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&url, e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status != StatusCode::OK {
            return Err(FetchError::BadStatus {
                url,
                status: status.as_u16(),
                content_type,
            });
        }

        let content_type = content_type.unwrap_or_default();
        if !content_type.contains("text/html") {
            return Err(FetchError::WrongContentType {
                url,
                status: status.as_u16(),
                content_type,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&url, e))
    }
}
