// src/report.rs
// =============================================================================
// The end-of-run summary, either human-readable or JSON.
// =============================================================================

use crate::crawl::CrawlOutcome;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

// What a run produced, in a form we can print or serialize
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_saved: usize,
    pub pages_failed: usize,
    /// URLs attempted (saved + failed)
    pub visited: usize,
    /// Saves that overwrote another URL's file
    pub collisions: usize,
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
}

impl CrawlSummary {
    pub fn new(outcome: &CrawlOutcome, output_dir: &Path, index_path: &Path) -> Self {
        Self {
            pages_saved: outcome.pages_saved,
            pages_failed: outcome.pages_failed,
            visited: outcome.visited.len(),
            collisions: outcome.collisions,
            output_dir: output_dir.to_path_buf(),
            index_path: index_path.to_path_buf(),
        }
    }
}

// Prints the summary either as JSON or as a short banner
pub fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", render_text(summary));
    }
    Ok(())
}

fn render_text(summary: &CrawlSummary) -> String {
    let rule = "=".repeat(60);
    let mut out = format!(
        "\n{rule}\nCOMPLETE! Saved {} pages to '{}/' folder\n{rule}\n",
        summary.pages_saved,
        summary.output_dir.display(),
    );

    if summary.pages_failed > 0 {
        out.push_str(&format!("   Failed: {}\n", summary.pages_failed));
    }
    if summary.collisions > 0 {
        out.push_str(&format!(
            "   File name collisions (later page kept): {}\n",
            summary.collisions
        ));
    }

    out.push_str(&format!("\nIndex saved to: {}\n", summary.index_path.display()));
    out
}
