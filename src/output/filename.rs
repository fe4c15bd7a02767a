// src/output/filename.rs
// =============================================================================
// Turns a page URL into the name of the file we save it under.
//
// Rules, applied in this order:
// 1. Take the URL's path ("/sdk/Content/Topics/Home.htm"), without any
//    ";params" on its last segment
// 2. Replace "/" and "\" with "_"          -> "_sdk_Content_Topics_Home.htm"
// 3. Empty path (or just "_") becomes "index"
// 4. Drop one leading "_"                   -> "sdk_Content_Topics_Home.htm"
// 5. Add ".html" unless it ends in .html/.htm
// 6. Replace any of <>:"|?* with "_"
//
// The mapping is deterministic but NOT one-to-one: "/a_b.htm" and "/a/b.htm"
// both become "a_b.htm". PageStore notices when that happens.
// =============================================================================

// Characters Windows (and some shells) refuse in file names
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

// Maps a URL to a flat, filesystem-safe file name
//
// Examples:
//   "https://host/sdk/Topics/Home.htm" -> "sdk_Topics_Home.htm"
//   "https://host/"                    -> "index.html"
//   "https://host/api/list"            -> "api_list.html"
pub fn sanitize_filename(url: &str) -> String {
    let mut name = raw_path(url).replace(['/', '\\'], "_");

    if name.is_empty() || name == "_" {
        name = "index".to_string();
    }

    if let Some(stripped) = name.strip_prefix('_') {
        name = stripped.to_string();
    }

    if !name.ends_with(".html") && !name.ends_with(".htm") {
        name.push_str(".html");
    }

    name.replace(UNSAFE_CHARS, "_")
}

// The path exactly as written in the URL text: after the authority,
// before any query or fragment, and before ";params" on the last segment
// ("/a.htm;jsessionid=1" -> "/a.htm")
//
// We deliberately don't go through Url::parse here. It would normalize the
// path (percent-encoding spaces, resolving "..") and change file names for
// URLs that differ only in how they were written.
fn raw_path(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return "";
    };

    let after_scheme = &url[scheme_end + 3..];
    let end = after_scheme
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(after_scheme.len());
    let without_query = &after_scheme[..end];

    let path = match without_query.find('/') {
        Some(start) => &without_query[start..],
        None => return "",
    };

    // Only the last segment carries params; ";" earlier in the path stays
    let last_segment = path.rfind('/').unwrap_or(0);
    match path[last_segment..].find(';') {
        Some(offset) => &path[..last_segment + offset],
        None => path,
    }
}
