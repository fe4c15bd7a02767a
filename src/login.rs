// src/login.rs
// =============================================================================
// The one manual step: a human logs in through the browser window.
//
// The portal sits behind an interactive sign-in (SSO, MFA...) that we don't
// try to automate. Instead we open the start page, ask the operator to log
// in, and block until they press Enter. The browser keeps the session
// cookies, so every page the crawler loads afterwards is authenticated.
// =============================================================================

use crate::browser::PageDriver;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::warn;

const PROMPT: &str = "Press Enter after you've logged in and can see the documentation...";

// Opens the start page, waits for the operator, then lets the page settle
pub async fn authenticate<D: PageDriver + ?Sized>(
    driver: &D,
    start_url: &str,
    timeout: Duration,
    settle: Duration,
) -> Result<()> {
    println!("Navigating to: {}", start_url);
    println!("\n{}", "=".repeat(60));
    println!("PLEASE LOG IN TO THE WEBSITE IN THE BROWSER WINDOW");
    println!("Once logged in and you see the documentation, press Enter here...");
    println!("{}\n", "=".repeat(60));

    // Login pages often redirect or keep polling, so a slow load here is
    // expected; the operator can still finish in the browser window
    if let Err(e) = driver.navigate(start_url, timeout).await {
        warn!("Start page did not settle: {}", e);
        eprintln!("  Warning: {}", e);
    }

    tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        wait_for_confirmation(&mut stdin.lock(), &mut stdout.lock(), PROMPT)
    })
    .await
    .context("Login prompt task failed")??;

    // Give the page a moment to fully load after login
    tokio::time::sleep(settle).await;
    Ok(())
}

// Prints `prompt` and blocks until a line (or just Enter) is read
//
// End of input means nobody can confirm the login, which is an error.
pub fn wait_for_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<()> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    if read == 0 {
        bail!("stdin closed before the login was confirmed");
    }
    Ok(())
}
