// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl itself, breadth-first.
//
// How it works:
// 1. Start with the seed URL in a queue
// 2. Take the URL at the front of the queue
// 3. Skip it if we've seen it, or if it's outside our domain / docs section
// 4. Mark it visited, load it in the browser, wait politely
// 5. Save the rendered HTML to disk
// 6. Collect the page's links and queue the ones that belong to the crawl
// 7. Repeat until the queue is empty
//
// Errors:
// - Loading or reading a page can fail (timeouts, dropped sessions...).
//   That page is logged and skipped; the crawl goes on. No retries.
// - Writing a file can fail too, and that one stops the crawl: if we can't
//   save pages there is no point fetching more of them.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Generics: Crawler works with any PageDriver, so tests can use a fake
// =============================================================================

use super::UrlFilter;
use crate::browser::{BrowserError, PageDriver};
use crate::extract::collect_links;
use crate::output::{PageRecord, PageStore};
use anyhow::Result;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

// Everything that shapes a crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub filter: UrlFilter,
    pub output_dir: PathBuf,
    /// Upper bound on loading one page (including the network-idle wait)
    pub navigation_timeout: Duration,
    /// Pause after each page load so we don't hammer the server
    pub politeness_delay: Duration,
}

// URLs waiting to be crawled, in the order we found them
//
// The set mirrors the queue so "is it already queued?" doesn't have to
// scan the whole VecDeque.
#[derive(Debug, Default)]
pub struct PendingQueue {
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds a URL to the back; returns false if it was already queued
    pub fn push(&mut self, url: String) -> bool {
        if !self.members.insert(url.clone()) {
            return false;
        }
        self.order.push_back(url);
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        let url = self.order.pop_front()?;
        self.members.remove(&url);
        Some(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.members.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

// What a finished crawl produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Every URL that passed the filters and was attempted
    pub visited: HashSet<String>,
    pub pages_saved: usize,
    pub pages_failed: usize,
    /// Saves that overwrote a file written for a different URL
    pub collisions: usize,
}

// The crawler owns all crawl state; the browser is borrowed so the caller
// can still close it no matter how the crawl ends
pub struct Crawler<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    store: PageStore,
    config: CrawlConfig,
    visited: HashSet<String>,
    pending: PendingQueue,
    pages_saved: usize,
    pages_failed: usize,
}

impl<'a, D: PageDriver + ?Sized> Crawler<'a, D> {
    pub fn new(driver: &'a D, store: PageStore, config: CrawlConfig) -> Self {
        Self {
            driver,
            store,
            config,
            visited: HashSet::new(),
            pending: PendingQueue::new(),
            pages_saved: 0,
            pages_failed: 0,
        }
    }

    // Crawls from `seed_url` until there is nothing left to visit
    //
    // Returns Err only if a page could not be written to disk.
    pub async fn crawl(&mut self, seed_url: &str) -> Result<()> {
        self.pending.push(seed_url.to_string());

        while let Some(url) = self.pending.pop() {
            // Skip if already visited
            if self.visited.contains(&url) {
                continue;
            }

            // Out-of-scope URLs are dropped without being marked visited
            if !self.config.filter.in_scope(&url) {
                debug!("Out of scope, skipping: {}", url);
                continue;
            }

            // Mark before fetching: even a failed page is never retried
            self.visited.insert(url.clone());

            println!("Fetching: {}", url);

            let html = match self.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    self.pages_failed += 1;
                    eprintln!("  Error fetching {}: {}", url, e);
                    continue;
                }
            };

            let record = self.store.save(&url, &html).await?;
            self.pages_saved += 1;
            println!(
                "  Saved: {} ({} pages total)",
                record.filename, self.pages_saved
            );

            debug!("Wrote {} bytes to {}", record.bytes, record.path.display());

            let queued = self.enqueue_links(&record, &html).await;
            debug!(
                "Queued {} new link(s) from {} ({} pending)",
                queued,
                url,
                self.pending.len()
            );
        }

        info!(
            "Crawl finished: {} saved, {} failed",
            self.pages_saved, self.pages_failed
        );
        Ok(())
    }

    // Loads a page and returns its rendered HTML
    async fn fetch(&self, url: &str) -> Result<String, BrowserError> {
        self.driver
            .navigate(url, self.config.navigation_timeout)
            .await?;

        // Polite crawling: small delay between requests
        tokio::time::sleep(self.config.politeness_delay).await;

        self.driver.rendered_html().await
    }

    // Queues every link on the page that belongs to the crawl and isn't
    // already visited or queued; returns how many were added
    async fn enqueue_links(&mut self, page: &PageRecord, html: &str) -> usize {
        let links = collect_links(self.driver, html, &page.url).await;

        let mut added = 0;
        for link in links {
            if self.visited.contains(&link) || self.pending.contains(&link) {
                continue;
            }
            if !self.config.filter.should_enqueue(&link) {
                continue;
            }
            if self.pending.push(link) {
                added += 1;
            }
        }
        added
    }

    // Consumes the crawler, keeping what the report and index need
    pub fn finish(self) -> CrawlOutcome {
        CrawlOutcome {
            collisions: self.store.collisions(),
            visited: self.visited,
            pages_saved: self.pages_saved,
            pages_failed: self.pages_failed,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is VecDeque?
//    - A double-ended queue (deck)
//    - push_back() adds to end, pop_front() removes from start
//    - Perfect for breadth-first search (BFS)
//
// 2. Why mark a URL visited BEFORE fetching it?
//    - If the fetch fails we still don't want to try it again
//    - Every URL gets exactly one attempt per run
//
// 3. Why are out-of-scope URLs NOT marked visited?
//    - They were never attempted, so they shouldn't show up in the index
//    - They can't come back anyway: links are filtered before queueing
//
// 4. What is `D: PageDriver + ?Sized`?
//    - D is "some type that implements PageDriver"
//    - ?Sized also allows trait objects like `dyn PageDriver`
//    - In production D is ChromeDriver; in tests it's a fake browser
//
// 5. What is the 'a lifetime on Crawler?
//    - The crawler borrows the browser instead of owning it
//    - 'a says "the crawler can't outlive the browser it borrows"
//    - Because it's only borrowed, main() can always close the browser
//      afterwards, even if the crawl returned an error
// -----------------------------------------------------------------------------
