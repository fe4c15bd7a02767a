// src/output/index.rs
// =============================================================================
// Writes _index.txt: which file holds which URL.
//
// Format:
//
//   Saved Documentation Pages:
//   ========================================
//
//   sdk_Topics_Home.htm
//     -> https://host/sdk/Topics/Home.htm
//
//   sdk_Topics_Foo.htm
//     -> https://host/sdk/Topics/Foo.htm
//
// Entries are sorted by URL. Every visited URL is listed, including ones
// whose fetch failed (their file name is still what they would have used).
// =============================================================================

use super::sanitize_filename;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "_index.txt";

// Builds the index text for a set of URLs
pub fn render_index<'a, I>(urls: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&String> = urls.into_iter().collect();
    sorted.sort();

    let mut out = String::from("Saved Documentation Pages:\n");
    out.push_str(&"=".repeat(40));
    out.push_str("\n\n");

    for url in sorted {
        out.push_str(&sanitize_filename(url));
        out.push_str("\n  -> ");
        out.push_str(url);
        out.push_str("\n\n");
    }

    out
}

// Writes the index into `output_dir` and returns its path
pub async fn write_index<'a, I>(urls: I, output_dir: &Path) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a String>,
{
    let path = output_dir.join(INDEX_FILE_NAME);
    let contents = render_index(urls);

    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Failed to write index '{}'", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entries_sorted_by_url() {
        let urls: HashSet<String> = [
            "https://host/sdk/b.htm".to_string(),
            "https://host/sdk/a.htm".to_string(),
        ]
        .into_iter()
        .collect();

        let text = render_index(&urls);
        let expected = "Saved Documentation Pages:\n\
                        ========================================\n\
                        \n\
                        sdk_a.htm\n  -> https://host/sdk/a.htm\n\n\
                        sdk_b.htm\n  -> https://host/sdk/b.htm\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_index_has_only_header() {
        let urls: Vec<String> = Vec::new();
        assert_eq!(
            render_index(&urls),
            format!("Saved Documentation Pages:\n{}\n\n", "=".repeat(40))
        );
    }

    #[tokio::test]
    async fn test_write_index_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let urls = vec!["https://host/".to_string()];

        let path = write_index(&urls, tmp.path()).await.unwrap();

        assert_eq!(path, tmp.path().join("_index.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.ends_with("index.html\n  -> https://host/\n\n"));
    }
}
