// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option has a default, so running plain `doc-harvester` crawls the
// Crestron Certified Drivers SDK documentation into ./crestron_docs.
// The flags exist so the same tool can be pointed at another section
// (or another portal) without editing code.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use crate::browser::LaunchOptions;
use crate::crawl::{CrawlConfig, UrlFilter};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_START_URL: &str =
    "https://sdkcon78221.crestron.com/sdk/Crestron_Certified_Drivers_SDK/Content/Topics/Home.htm";
pub const DEFAULT_DOMAIN: &str = "sdkcon78221.crestron.com";
pub const DEFAULT_PATH_MARKER: &str = "Crestron_Certified_Drivers_SDK";
pub const DEFAULT_OUTPUT_DIR: &str = "crestron_docs";

// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "doc-harvester",
    version = "0.1.0",
    about = "Log into a documentation portal in a real browser, then save every page of one docs section",
    long_about = "doc-harvester opens Chrome, waits while you log in by hand, then crawls every \
                  same-domain link under the path marker and saves the rendered HTML plus an \
                  _index.txt listing."
)]
pub struct Cli {
    /// Page to open for login and to start crawling from
    #[arg(long, default_value = DEFAULT_START_URL)]
    pub start_url: String,

    /// Only URLs on exactly this host (host:port if non-default) are crawled
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Only URLs whose path contains this text are crawled
    #[arg(long, default_value = DEFAULT_PATH_MARKER)]
    pub path_marker: String,

    /// Directory the HTML files and _index.txt are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Maximum time to load one page, including waiting for network idle
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Pause after each page load, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Pause after the login is confirmed, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub settle_ms: u64,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Chrome/Chromium executable (otherwise CHROMIUM_PATH or a search)
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Skip the manual login prompt (for portals that need no login)
    #[arg(long)]
    pub no_login_pause: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            filter: UrlFilter::new(&self.domain, &self.path_marker),
            output_dir: self.output_dir.clone(),
            navigation_timeout: self.navigation_timeout(),
            politeness_delay: Duration::from_millis(self.delay_ms),
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            chrome_path: self.chrome_path.clone(),
            user_data_dir: LaunchOptions::default_user_data_dir(),
        }
    }
}
