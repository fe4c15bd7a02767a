// src/crawl/filter.rs
// =============================================================================
// Decides which URLs belong to the crawl.
//
// Two checks make a URL "in scope":
// - Domain filter: the URL's host (plus port, if it has one) must equal
//   the configured domain exactly. Subdomains don't count.
// - Path-marker filter: the URL's path must contain the marker string,
//   e.g. "Crestron_Certified_Drivers_SDK". This keeps us inside one
//   documentation section of a bigger site.
//
// Links found on a page get two extra checks before they are queued:
// - no javascript: pseudo-URLs
// - no "#" anywhere (in-page anchors would just re-fetch the same page)
// =============================================================================

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilter {
    domain: String,
    path_marker: String,
}

impl UrlFilter {
    pub fn new(domain: impl Into<String>, path_marker: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path_marker: path_marker.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path_marker(&self) -> &str {
        &self.path_marker
    }

    // True when the URL passes both the domain and the path-marker filter
    //
    // Unparseable URLs are never in scope.
    pub fn in_scope(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        host_with_port(&parsed).as_deref() == Some(self.domain.as_str())
            && parsed.path().contains(&self.path_marker)
    }

    // True when a link found on a page should be added to the queue
    //
    // Visited/pending checks are the crawler's job; this only looks at
    // the URL itself.
    pub fn should_enqueue(&self, link: &str) -> bool {
        let is_script = link
            .get(..11)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"));

        !is_script && !link.contains('#') && self.in_scope(link)
    }
}

// "host" or "host:port", the way it appears in the URL's authority
fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
