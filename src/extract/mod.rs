// src/extract/mod.rs
// =============================================================================
// This module finds the hyperlinks on the page the browser is showing.
//
// Submodules:
// - script: JavaScript run inside the page (the primary way)
// - html: parse the rendered HTML ourselves (the fallback)
//
// Either way the result is a list of absolute URLs, unfiltered.
// =============================================================================

mod html;
mod script;

pub use html::extract_html_links;
pub use script::{decode_links, LINKS_SCRIPT};

use crate::browser::PageDriver;
use tracing::{debug, warn};

// Collects every anchor target on the current page
//
// Parameters:
//   driver: the browser, already showing `page_url`
//   html: the rendered HTML we just saved (used only by the fallback)
//   page_url: the page's URL, for resolving relative links in the fallback
//
// This never fails: if the script route doesn't work we parse `html`.
pub async fn collect_links<D: PageDriver + ?Sized>(
    driver: &D,
    html: &str,
    page_url: &str,
) -> Vec<String> {
    match driver.evaluate(LINKS_SCRIPT).await {
        Ok(value) => {
            if let Some(links) = decode_links(value) {
                debug!("Script found {} links on {}", links.len(), page_url);
                return links;
            }
            warn!("Link script returned a non-array on {}, parsing HTML instead", page_url);
        }
        Err(e) => {
            warn!("Link script failed on {}: {}, parsing HTML instead", page_url, e);
        }
    }

    extract_html_links(html, page_url)
}
