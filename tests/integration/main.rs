//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the catalog site and exercise
//! fetching, extraction and persistence end-to-end.

mod common;
mod pipeline_tests;
