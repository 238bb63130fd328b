//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section is optional and defaults to the reference deployment
//! (the omarket.kz laptop catalog with its eight categories).
//!
//! # Example
//!
//! ```no_run
//! use omarket_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Categories: {}", config.categories.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_categories, CategoryConfig, Config, HttpConfig, OutputConfig, SiteConfig,
    DEFAULT_ACCEPT, DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
