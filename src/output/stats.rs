//! Statistics from the product database
//!
//! This module provides functionality for extracting and displaying
//! what is currently stored, independent of any run.

use crate::storage::{ProductStore, StoreResult};

/// Stored product statistics
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored products
    pub total_products: u64,

    /// Stored products per category, sorted by category name
    pub products_by_category: Vec<(String, u64)>,
}

/// Loads statistics from the store
///
/// # Arguments
///
/// * `store` - The product store to query
pub fn load_statistics(store: &dyn ProductStore) -> StoreResult<StoreStatistics> {
    let total_products = store.count_products()?;
    let products_by_category = store.count_by_category()?;

    Ok(StoreStatistics {
        total_products,
        products_by_category,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Product Statistics ===\n");

    println!("Total products stored: {}", stats.total_products);
    println!();

    if stats.products_by_category.is_empty() {
        println!("No products stored yet.");
        return;
    }

    println!("Products by Category:");
    for (category, count) in &stats.products_by_category {
        let percentage = if stats.total_products > 0 {
            (*count as f64 / stats.total_products as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
}
