//! End-of-run summary
//!
//! Collects the per-category reports of one run and prints them.

use crate::crawler::CategoryReport;
use crate::state::CategoryState;
use std::time::Duration;

/// Outcome of one full pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One report per category, in configuration order
    pub reports: Vec<CategoryReport>,

    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(reports: Vec<CategoryReport>, elapsed: Duration) -> Self {
        Self { reports, elapsed }
    }

    /// Number of categories that reached `Done`
    pub fn done_count(&self) -> usize {
        self.reports.iter().filter(|r| r.state.is_success()).count()
    }

    /// Number of categories that ended `Failed`
    pub fn failed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.state == CategoryState::Failed)
            .count()
    }

    /// Records that reached the store across all categories
    pub fn total_persisted(&self) -> usize {
        self.reports.iter().map(CategoryReport::persisted).sum()
    }

    pub fn total_pages_failed(&self) -> usize {
        self.reports.iter().map(|r| r.pages_failed).sum()
    }

    /// Report for the named category, if it was part of the run
    pub fn report(&self, category: &str) -> Option<&CategoryReport> {
        self.reports.iter().find(|r| r.category == category)
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!(
        "  {:<24} {:>10} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "Category", "State", "Pages", "Failed", "Records", "Skipped", "Stored"
    );
    for report in &summary.reports {
        println!(
            "  {:<24} {:>10} {:>6} {:>8} {:>8} {:>8} {:>8}",
            report.category,
            report.state.as_str(),
            report.pages_fetched,
            report.pages_failed,
            report.records_extracted,
            report.records_skipped,
            report.persisted()
        );
    }
    println!();

    let failures: Vec<_> = summary
        .reports
        .iter()
        .filter_map(|r| r.failure.as_ref().map(|f| (&r.category, f)))
        .collect();
    if !failures.is_empty() {
        println!("Failed Categories ({}):", failures.len());
        for (category, reason) in failures {
            println!("  - {}: {}", category, reason);
        }
        println!();
    }

    println!(
        "Categories: {} done, {} failed | Products stored: {} | Failed pages: {}",
        summary.done_count(),
        summary.failed_count(),
        summary.total_persisted(),
        summary.total_pages_failed()
    );
    println!("Execution time: {:.2} seconds", summary.elapsed.as_secs_f64());
}
