//! Windowed contract ingestion.
//!
//! The fetcher authenticates once against the remote contract system, then
//! walks a date range in fixed-size windows, issuing one request per window
//! and writing each JSON response to its own batch file. A failed window is
//! logged and skipped; only a failed login aborts the run.

use crate::config::SourceConfig;
use crate::models::FetchWindow;
use chrono::{Duration, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised at the ingestion boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Login rejected or unreachable. Fatal for the whole run.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure or non-2xx status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Could not create the output directory or write a batch file.
    #[error("batch write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a scrape run, for the operator-facing summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOutcome {
    /// Windows whose batch was written to disk.
    pub saved: usize,
    /// Windows skipped after a fetch, parse, or write failure.
    pub failed: usize,
}

/// Partition `[start, end]` into consecutive inclusive windows.
///
/// Each window spans `interval_days` calendar days; the last one is
/// clipped so its end equals `end`. Windows are contiguous and
/// non-overlapping and cover the range exactly.
///
/// Preconditions: `start <= end`, `interval_days >= 1`. Both are checked
/// before this is reached (CLI and config validation), but an interval
/// of 0 is clamped to 1 here as well so no caller can loop forever.
pub fn windows(start: NaiveDate, end: NaiveDate, interval_days: u32) -> Vec<FetchWindow> {
    let interval_days = interval_days.max(1);
    let mut out = Vec::new();
    let mut current = start;

    while current <= end {
        let window_end = std::cmp::min(current + Duration::days(interval_days as i64 - 1), end);
        out.push(FetchWindow {
            start: current,
            end: window_end,
        });
        current = window_end + Duration::days(1);
    }

    out
}

/// Sequential, session-authenticated contract fetcher.
///
/// All state is explicit: the HTTP client (with its cookie jar), the
/// source endpoints, and the output directory are passed in at
/// construction. Nothing global is touched.
pub struct Fetcher {
    client: Client,
    source: SourceConfig,
    out_dir: PathBuf,
    show_progress: bool,
}

impl Fetcher {
    /// Build a fetcher with a cookie-holding client and the configured timeout.
    pub fn new(source: SourceConfig, out_dir: PathBuf, show_progress: bool) -> Result<Self, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(source.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            source,
            out_dir,
            show_progress,
        })
    }

    /// Authenticate against the login endpoint.
    ///
    /// Performs an initial GET to seed session cookies, then POSTs the
    /// credentials as a form. The remote redirects back to the login page
    /// on bad credentials, so landing on a URL containing "login" means
    /// the session was not established.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), FetchError> {
        let login_url = self.source.login_url();
        debug!("Requesting login page: {}", login_url);

        self.client
            .get(&login_url)
            .send()
            .await?
            .error_for_status()?;

        let params = [("username", username), ("password", password)];
        let response = self
            .client
            .post(&login_url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;

        if response.url().path().to_lowercase().contains("login") {
            return Err(FetchError::Auth(
                "still on the login page after submitting credentials".to_string(),
            ));
        }

        info!("Login successful");
        Ok(())
    }

    /// Fetch every window in `[start, end]` and persist the batches.
    ///
    /// A single window's failure never halts the run; it is logged with
    /// the window bounds and counted in the outcome. A fixed delay runs
    /// between consecutive requests regardless of success or failure.
    pub async fn run(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        interval_days: u32,
    ) -> Result<FetchOutcome, FetchError> {
        fs::create_dir_all(&self.out_dir)?;

        let plan = windows(start, end, interval_days);
        info!(
            "Fetching {} windows from {} to {} ({} day interval)",
            plan.len(),
            start,
            end,
            interval_days
        );

        let progress = self.make_progress_bar(plan.len() as u64);
        let delay = std::time::Duration::from_secs(self.source.delay_seconds);
        let mut outcome = FetchOutcome::default();

        for (i, window) in plan.iter().enumerate() {
            match self.fetch_window(window).await {
                Ok(()) => {
                    outcome.saved += 1;
                    info!("Saved batch for {}", window);
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!("Skipping window {}: {}", window, e);
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            // Rate limit between requests; nothing to wait for after the last.
            if i + 1 < plan.len() {
                tokio::time::sleep(delay).await;
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(outcome)
    }

    /// Fetch one window and write its batch file.
    async fn fetch_window(&self, window: &FetchWindow) -> Result<(), FetchError> {
        let response = self
            .client
            .get(self.source.search_url())
            .query(&[
                ("from", window.start.to_string()),
                ("to", window.end.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;

        let path = self.out_dir.join(window.file_name());
        fs::write(&path, serde_json::to_string_pretty(&data)?)?;
        debug!("Wrote {}", path.display());

        Ok(())
    }

    fn make_progress_bar(&self, len: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    }
}
