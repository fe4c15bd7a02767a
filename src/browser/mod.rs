// src/browser/mod.rs
// =============================================================================
// This module is everything we need from a web browser.
//
// The crawler never talks to Chrome directly. It talks to the PageDriver
// trait below, which is the small set of things a browser has to do for us:
// - navigate to a URL (and wait until the page settles)
// - hand back the rendered HTML
// - run a bit of JavaScript and return the result as JSON
// - shut down
//
// Submodules:
// - chrome: the real implementation, on top of chromiumoxide
//
// Rust concepts:
// - Traits: A shared interface that different types can implement
// - async-trait: Rust traits can't (portably) have async methods yet,
//   so the #[async_trait] macro rewrites them into boxed futures for us
// - thiserror: Derive an error enum with nice Display messages
// =============================================================================

mod chrome;

pub use chrome::{ChromeDriver, LaunchOptions};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

// Everything that can go wrong while driving the browser
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No Chrome/Chromium binary could be located
    #[error("Chrome/Chromium executable not found (set --chrome-path or CHROMIUM_PATH)")]
    ExecutableNotFound,

    /// The browser process could not be started
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// The page could not be loaded
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not settle within the navigation timeout
    #[error("navigation to {url} timed out after {duration:?}")]
    Timeout { url: String, duration: Duration },

    /// The rendered HTML could not be read
    #[error("could not read page content: {0}")]
    Content(String),

    /// A script threw or returned something we could not decode
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// The browser did not shut down cleanly
    #[error("failed to close browser: {0}")]
    Close(String),
}

// The browser capabilities the crawler depends on
//
// One page is reused for every navigation, so all page operations act on
// "the current page". Methods take &self because the underlying CDP page
// handle is itself shareable; only close() needs exclusive access.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the network to go idle, bounded by `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Full serialized DOM of the current page
    async fn rendered_html(&self) -> Result<String, BrowserError>;

    /// Evaluate a JavaScript expression on the current page
    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError>;

    /// Release the browser session
    async fn close(&mut self) -> Result<(), BrowserError>;
}

// Closes the browser once the work that needed it is over, however it ended
//
// A failed close is only logged; the caller gets the work's own result.
pub async fn close_after<D, T>(driver: &mut D, result: anyhow::Result<T>) -> anyhow::Result<T>
where
    D: PageDriver + ?Sized,
{
    if let Err(e) = driver.close().await {
        warn!("{}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    // Counts close() calls; optionally fails them
    #[derive(Default)]
    struct ClosingDriver {
        closes: usize,
        close_fails: bool,
    }

    #[async_trait]
    impl PageDriver for ClosingDriver {
        async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
            Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "not used".into(),
            })
        }

        async fn rendered_html(&self) -> Result<String, BrowserError> {
            Err(BrowserError::Content("not used".into()))
        }

        async fn evaluate(&self, _script: &str) -> Result<Value, BrowserError> {
            Err(BrowserError::Script("not used".into()))
        }

        async fn close(&mut self) -> Result<(), BrowserError> {
            self.closes += 1;
            if self.close_fails {
                return Err(BrowserError::Close("already gone".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_closes_when_the_crawl_failed() {
        let mut driver = ClosingDriver::default();

        let result: anyhow::Result<()> = Err(anyhow!("Failed to write page"));
        let result = close_after(&mut driver, result).await;

        assert_eq!(driver.closes, 1);
        assert_eq!(result.unwrap_err().to_string(), "Failed to write page");
    }

    #[tokio::test]
    async fn test_close_failure_does_not_hide_a_successful_crawl() {
        let mut driver = ClosingDriver {
            close_fails: true,
            ..Default::default()
        };

        let result = close_after(&mut driver, Ok(3)).await;

        assert_eq!(driver.closes, 1);
        assert_eq!(result.unwrap(), 3);
    }
}
