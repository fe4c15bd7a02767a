// src/crawl/mod.rs
// =============================================================================
// This module handles crawling the documentation section.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-domain and path-marker restriction (stays in one docs section)
// - Each URL fetched at most once per run
// - Polite crawling with a fixed delay after each page load
//
// Submodules:
// - filter: which URLs belong to the crawl
// - queue: the crawl loop and its state
// =============================================================================

mod filter;
mod queue;

pub use filter::UrlFilter;
pub use queue::{CrawlConfig, CrawlOutcome, Crawler};
