//! Output module for run summaries and store statistics
//!
//! This module handles:
//! - Summarizing a run per category
//! - Reporting what the product database currently holds

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{print_summary, RunSummary};
