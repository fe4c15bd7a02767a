// src/browser/chrome.rs
// =============================================================================
// The real browser: Chrome/Chromium driven over the DevTools protocol.
//
// How it works:
// 1. Find a Chrome executable on this machine
// 2. Launch it (headed by default, so a human can log in)
// 3. Spawn a background task that pumps DevTools protocol messages
// 4. Open ONE tab and reuse it for every page we visit
//
// "Network idle":
// - page.goto() returns once the load event fired, but documentation
//   portals keep pulling in scripts, TOC fragments and search indexes
//   after that
// - So we poll the number of loaded resources and wait until it stops
//   changing for a short window (and readyState is "complete")
// - The whole thing is bounded by the navigation timeout
//
// The profile directory:
// - The manual login leaves session cookies in it
// - It is removed once the browser has exited, and also when the driver is
//   dropped without close() (or launch() fails after creating it)
// =============================================================================

use super::{BrowserError, PageDriver};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

// How long the resource count must stay flat before we call the page idle
const IDLE_WINDOW: Duration = Duration::from_millis(500);

// How often we re-check the page while waiting for idle
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Reports readiness and how many subresources the page has loaded so far
const LOAD_STATE_SCRIPT: &str = r#"
    (() => ({
        readyState: document.readyState,
        resources: performance.getEntriesByType('resource').length
    }))()
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadState {
    ready_state: String,
    resources: u64,
}

// Decides when a page has gone quiet
//
// Fed one LoadState per poll; the page is idle once readyState is
// "complete" and the resource count hasn't changed for IDLE_WINDOW.
#[derive(Debug)]
struct IdleTracker {
    last_count: Option<u64>,
    stable_since: Instant,
}

impl IdleTracker {
    fn new(now: Instant) -> Self {
        Self {
            last_count: None,
            stable_since: now,
        }
    }

    // Records one observation; true means the page is idle
    fn observe(&mut self, state: &LoadState, now: Instant) -> bool {
        if self.last_count != Some(state.resources) {
            self.last_count = Some(state.resources);
            self.stable_since = now;
            return false;
        }
        state.ready_state == "complete" && now.duration_since(self.stable_since) >= IDLE_WINDOW
    }
}

// The browser profile on disk; removed when this is removed or dropped
#[derive(Debug)]
struct ProfileDir {
    path: Option<PathBuf>,
}

impl ProfileDir {
    fn create(path: &Path) -> Result<Self, BrowserError> {
        std::fs::create_dir_all(path).map_err(|e| {
            BrowserError::Launch(format!(
                "cannot create profile dir {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
        })
    }

    // Must run after the browser process exited, or Windows keeps files locked
    fn remove(&mut self) {
        if let Some(path) = self.path.take() {
            debug!("Removing browser profile {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove browser profile {}: {}. It holds session cookies; delete it by hand.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        self.remove();
    }
}

// How to start the browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a window (login then has to happen some other way)
    pub headless: bool,
    /// Explicit executable, skips the search
    pub chrome_path: Option<PathBuf>,
    /// Profile directory; cookies from the manual login live here
    pub user_data_dir: PathBuf,
}

impl LaunchOptions {
    // A per-process profile directory in the system temp dir
    pub fn default_user_data_dir() -> PathBuf {
        std::env::temp_dir().join(format!("doc_harvester_chrome_{}", std::process::id()))
    }
}

// A running browser with the single tab we crawl in
pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler: Option<JoinHandle<()>>,
    closed: bool,
    // Last field: dropped after `browser`, whose Drop kills the process
    profile: ProfileDir,
}

impl ChromeDriver {
    // Starts the browser and opens a blank tab
    //
    // Any failure here is fatal for the run, so callers just use `?`
    pub async fn launch(options: &LaunchOptions) -> Result<Self, BrowserError> {
        let executable = find_browser_executable(options.chrome_path.as_deref())?;

        // From here on an early return drops the guard and removes the dir
        let profile = ProfileDir::create(&options.user_data_dir)?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .user_data_dir(options.user_data_dir.clone())
            .request_timeout(Duration::from_secs(60))
            .window_size(1280, 900)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-notifications");

        if !options.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(BrowserError::Launch)?;

        info!("Launching browser (headless: {})", options.headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler stream must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // Chrome sends some events chromiumoxide has no type for
                    if message.contains("data did not match any variant")
                        || message.contains("Failed to deserialize WS response")
                    {
                        trace!("Ignoring unknown CDP message: {}", message);
                    } else {
                        error!("Browser handler error: {}", message);
                    }
                }
            }
            debug!("Browser handler task finished");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("cannot open tab: {}", e)))?;

        Ok(Self {
            browser,
            page,
            handler: Some(handler_task),
            closed: false,
            profile,
        })
    }

    // Polls the page until its resource count has been stable for IDLE_WINDOW
    //
    // This never returns an error: a page whose state we cannot read is
    // simply polled again until the caller's timeout fires.
    async fn wait_for_network_idle(&self) {
        let mut tracker = IdleTracker::new(Instant::now());

        loop {
            match self.read_load_state().await {
                Ok(state) => {
                    if tracker.observe(&state, Instant::now()) {
                        return;
                    }
                }
                Err(e) => debug!("Could not read load state: {}", e),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn read_load_state(&self) -> Result<LoadState, BrowserError> {
        let value = self.evaluate(LOAD_STATE_SCRIPT).await?;
        serde_json::from_value(value).map_err(|e| BrowserError::Script(e.to_string()))
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        let load = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| BrowserError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            self.wait_for_network_idle().await;
            Ok::<(), BrowserError>(())
        };

        match tokio::time::timeout(timeout, load).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout {
                url: url.to_string(),
                duration: timeout,
            }),
        }
    }

    async fn rendered_html(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;

        result
            .into_value::<Value>()
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::Close(e.to_string()))?;

        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }

        if let Some(handler) = self.handler.take() {
            if let Err(e) = handler.await {
                warn!("Browser handler task panicked: {}", e);
            }
        }

        self.profile.remove();

        info!("Browser closed");
        Ok(())
    }
}

// Finds a Chrome/Chromium executable
//
// Search order:
// 1. The path given on the command line
// 2. The CHROMIUM_PATH environment variable
// 3. Well-known install locations for this platform
// 4. `which` on Unix
pub fn find_browser_executable(explicit: Option<&Path>) -> Result<PathBuf, BrowserError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        warn!("--chrome-path points to a missing file: {}", path.display());
    }

    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH points to a missing file: {}", path.display());
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    if let Some(found) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        info!("Found browser at: {}", found.display());
        return Ok(found);
    }

    if !cfg!(target_os = "windows") {
        for name in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            let Ok(output) = Command::new("which").arg(name).output() else {
                continue;
            };
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    info!("Found browser with `which {}`: {}", name, path);
                    return Ok(PathBuf::from(path));
                }
            }
        }
    }

    Err(BrowserError::ExecutableNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake_chrome = dir.path().join("chrome");
        std::fs::write(&fake_chrome, b"").unwrap();

        let found = find_browser_executable(Some(fake_chrome.as_path())).unwrap();
        assert_eq!(found, fake_chrome);
    }

    #[test]
    fn test_load_state_decodes_from_script_result() {
        let value = serde_json::json!({ "readyState": "complete", "resources": 12 });
        let state: LoadState = serde_json::from_value(value).unwrap();
        assert_eq!(state.ready_state, "complete");
        assert_eq!(state.resources, 12);
    }

    fn state(ready_state: &str, resources: u64) -> LoadState {
        LoadState {
            ready_state: ready_state.to_string(),
            resources,
        }
    }

    #[test]
    fn test_idle_after_count_stable_for_exactly_the_window() {
        let start = Instant::now();
        let mut tracker = IdleTracker::new(start);

        // The first reading only starts the clock
        assert!(!tracker.observe(&state("complete", 5), start));
        assert!(!tracker.observe(&state("complete", 5), start + Duration::from_millis(499)));
        assert!(tracker.observe(&state("complete", 5), start + IDLE_WINDOW));
    }

    #[test]
    fn test_changing_count_restarts_the_window() {
        let start = Instant::now();
        let mut tracker = IdleTracker::new(start);

        assert!(!tracker.observe(&state("complete", 1), start));
        let grew = start + Duration::from_millis(600);
        assert!(!tracker.observe(&state("complete", 2), grew));
        assert!(!tracker.observe(&state("complete", 2), grew + Duration::from_millis(400)));
        assert!(tracker.observe(&state("complete", 2), grew + Duration::from_millis(500)));
    }

    #[test]
    fn test_stable_count_is_not_idle_until_complete() {
        let start = Instant::now();
        let mut tracker = IdleTracker::new(start);

        assert!(!tracker.observe(&state("interactive", 3), start));
        assert!(!tracker.observe(&state("interactive", 3), start + Duration::from_secs(5)));
        // Stable long enough already, so completion alone finishes the wait
        assert!(tracker.observe(&state("complete", 3), start + Duration::from_secs(6)));
    }

    #[test]
    fn test_profile_dir_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("profile");

        {
            let _profile = ProfileDir::create(&path).unwrap();
            std::fs::create_dir_all(path.join("Default")).unwrap();
            std::fs::write(path.join("Default/Cookies"), b"session").unwrap();
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_profile_dir_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("profile");

        let mut profile = ProfileDir::create(&path).unwrap();
        profile.remove();
        assert!(!path.exists());

        // Recreated by someone else: a second remove (or the drop) leaves it alone
        std::fs::create_dir_all(&path).unwrap();
        profile.remove();
        drop(profile);
        assert!(path.exists());
    }

    #[test]
    fn test_default_profile_dir_is_per_process() {
        let dir = LaunchOptions::default_user_data_dir();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with(&std::process::id().to_string()));
    }
}
