use crate::config::types::{CategoryConfig, Config, HttpConfig, OutputConfig, SiteConfig};
use crate::{ConfigError, ConfigResult};
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates outbound request configuration
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.accept.trim().is_empty() {
        return Err(ConfigError::Validation("accept cannot be empty".to_string()));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_in_flight < 1 || config.max_in_flight > 100 {
        return Err(ConfigError::Validation(format!(
            "max-in-flight must be between 1 and 100, got {}",
            config.max_in_flight
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category table
fn validate_categories(categories: &[CategoryConfig]) -> ConfigResult<()> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in categories {
        validate_category(category)?;

        if !seen.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate category name '{}'",
                category.name
            )));
        }
    }

    Ok(())
}

/// Validates a single category entry
fn validate_category(category: &CategoryConfig) -> ConfigResult<()> {
    if category.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "category name cannot be empty".to_string(),
        ));
    }

    if !category.url_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "url-path of '{}' must start with '/', got '{}'",
            category.name, category.url_path
        )));
    }

    if category.first_page < 1 {
        return Err(ConfigError::Validation(format!(
            "first-page of '{}' must be >= 1, got {}",
            category.name, category.first_page
        )));
    }

    if category.last_page < category.first_page {
        return Err(ConfigError::Validation(format!(
            "last-page of '{}' must be >= first-page ({}), got {}",
            category.name, category.first_page, category.last_page
        )));
    }

    Ok(())
}
