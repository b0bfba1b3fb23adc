//! Integration tests for dead-link-checker

mod crawl_tests;
mod report_tests;
