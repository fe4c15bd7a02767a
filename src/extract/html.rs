// src/extract/html.rs
// =============================================================================
// This module extracts links from rendered HTML.
//
// It is the fallback for when the in-page link script can't be evaluated
// (see script.rs). It does the same job the browser does for `a.href`:
// take every <a href="..."> and turn it into an absolute URL.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative URLs against the page URL.
//
// Note: no filtering happens here. javascript: links, fragments and other
// sites are all returned; the crawler's UrlFilter decides what to keep.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

// Extracts all anchor targets from HTML content, resolved to absolute URLs
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: Vec<String> in document order
//
// Example:
//   html = "<a href='Foo.htm'>Foo</a>"
//   base_url = "https://host/sdk/Topics/Home.htm"
//   result = ["https://host/sdk/Topics/Foo.htm"]
pub fn extract_html_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => {
            // If base URL is invalid, we can't resolve relative links
            warn!("Invalid base URL: {}", base_url);
            return links;
        }
    };

    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // "a[href]" is a constant, known-valid selector
    let selector = Selector::parse("a[href]").unwrap();

    // A <base href> changes what relative links resolve against
    let base = document_base(&document, &base);

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Applies the first <base href="..."> in the document, if any
fn document_base(document: &Html, page_url: &Url) -> Url {
    let selector = Selector::parse("base[href]").unwrap();

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/docs/page.htm"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other.htm" -> Some("https://example.com/other.htm")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "" -> None (an empty href points back at the page itself)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // join() handles both cases: absolute hrefs replace the base entirely,
    // relative ones are resolved against it
    base.join(href).ok().map(|url| url.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just read the href attribute as-is?
//    - Documentation sites use lots of relative links ("../Topics/Foo.htm")
//    - The crawler compares full URLs, so every link must be absolute
//    - Url::join() applies the same rules a browser uses
//
// 2. Why would the page have a <base> tag?
//    - Some help-authoring tools emit one so that every page can use
//      links relative to the help root
//    - Browsers honor it, so we do too
//
// 3. Why unwrap() on the selectors?
//    - Selector::parse can only fail for an invalid CSS selector
//    - Ours are constants, so a failure would be a programmer error
// -----------------------------------------------------------------------------
