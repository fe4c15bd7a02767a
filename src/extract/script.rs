// src/extract/script.rs
// =============================================================================
// The in-page link collector.
//
// Running the collection inside the browser means we see links exactly the
// way the page sees them: after scripts have built the navigation tree, and
// with `a.href` already resolved to an absolute URL by the browser itself.
// =============================================================================

use serde_json::Value;

// Returns every anchor's resolved href, in document order
pub const LINKS_SCRIPT: &str = r#"
    (() => Array.from(document.querySelectorAll('a[href]'), a => a.href))()
"#;

// Turns the script's JSON result into a list of URLs
//
// Returns None when the result isn't an array at all (for example the page
// replaced the document with something odd), so the caller can fall back
// to parsing the HTML. Non-string entries inside the array are skipped.
pub fn decode_links(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(url) if !url.is_empty() => Some(url),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_string_array() {
        let value = json!(["https://host/a.htm", "https://host/b.htm"]);
        assert_eq!(
            decode_links(value),
            Some(vec![
                "https://host/a.htm".to_string(),
                "https://host/b.htm".to_string()
            ])
        );
    }

    #[test]
    fn test_skips_non_strings_and_empties() {
        let value = json!(["https://host/a.htm", null, 3, ""]);
        assert_eq!(decode_links(value), Some(vec!["https://host/a.htm".to_string()]));
    }

    #[test]
    fn test_rejects_non_array() {
        assert_eq!(decode_links(json!(null)), None);
        assert_eq!(decode_links(json!({ "links": [] })), None);
    }
}
