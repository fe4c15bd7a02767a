// src/output/store.rs
// =============================================================================
// Writes saved pages into the output directory.
//
// Each URL is written once, to <output_dir>/<sanitize_filename(url)>.
// If the file already exists it is overwritten (last writer wins).
//
// Collisions: two different URLs can map to the same file name. We keep the
// overwrite behavior but remember which URL owns each name, so a collision
// is logged and counted instead of passing silently.
// =============================================================================

use super::sanitize_filename;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

// One page saved to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug)]
pub struct PageStore {
    dir: PathBuf,
    // filename -> URL that last wrote it
    owners: HashMap<String, String>,
    collisions: usize,
}

impl PageStore {
    // Creates the output directory (and parents) if needed
    //
    // Failing here is fatal: there is nowhere to put the pages.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;

        Ok(Self {
            dir,
            owners: HashMap::new(),
            collisions: 0,
        })
    }

    // How many times a save replaced a file written for a different URL
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    // Saves one page's HTML
    //
    // Errors are returned to the caller; a failed write stops the crawl.
    pub async fn save(&mut self, url: &str, html: &str) -> Result<PageRecord> {
        let filename = sanitize_filename(url);
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("Failed to write '{}' for {}", path.display(), url))?;

        if let Some(previous) = self.owners.insert(filename.clone(), url.to_string()) {
            if previous != url {
                self.collisions += 1;
                warn!(
                    "{} overwrote {} (both save as '{}')",
                    url, previous, filename
                );
            }
        }

        Ok(PageRecord {
            url: url.to_string(),
            filename,
            path,
            bytes: html.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_under_sanitized_name() {
        let tmp = TempDir::new().unwrap();
        let mut store = PageStore::create(tmp.path().join("docs")).await.unwrap();

        let record = store
            .save("https://host/sdk/Topics/Home.htm", "<html>home</html>")
            .await
            .unwrap();

        assert_eq!(record.filename, "sdk_Topics_Home.htm");
        assert_eq!(record.bytes, 17);
        let written = std::fs::read_to_string(tmp.path().join("docs/sdk_Topics_Home.htm")).unwrap();
        assert_eq!(written, "<html>home</html>");
    }

    #[tokio::test]
    async fn test_collision_overwrites_and_is_counted() {
        let tmp = TempDir::new().unwrap();
        let mut store = PageStore::create(tmp.path()).await.unwrap();

        store.save("https://host/a_b.htm", "first").await.unwrap();
        store.save("https://host/a/b.htm", "second").await.unwrap();

        assert_eq!(store.collisions(), 1);
        let written = std::fs::read_to_string(tmp.path().join("a_b.htm")).unwrap();
        assert_eq!(written, "second");
    }

    #[tokio::test]
    async fn test_rewriting_same_url_is_not_a_collision() {
        let tmp = TempDir::new().unwrap();
        let mut store = PageStore::create(tmp.path()).await.unwrap();

        store.save("https://host/a.htm", "one").await.unwrap();
        store.save("https://host/a.htm", "two").await.unwrap();

        assert_eq!(store.collisions(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut store = PageStore::create(tmp.path().join("out")).await.unwrap();
        std::fs::remove_dir(tmp.path().join("out")).unwrap();

        assert!(store.save("https://host/a.htm", "x").await.is_err());
    }
}
