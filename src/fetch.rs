//! HTTP transfer for remote archives
//!
//! A trait-based seam so the install pipeline can be exercised without
//! network access. The production implementation uses a shared `ureq` agent
//! with a global timeout; a non-2xx response or a stalled transfer is an
//! explicit error, never a logged-and-ignored condition.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{LadError, Result};

/// Network timeout for archive transfers
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetches a remote resource to a local file
pub trait Fetch {
    /// Issue a GET for `url` and stream the body into `dest`
    ///
    /// # Errors
    ///
    /// Returns [`LadError::TransferFailed`] for a non-2xx status and
    /// [`LadError::HttpError`] for transport failures or body write errors.
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// HTTP-based fetcher using `ureq`
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, e))?;

        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let bar = transfer_bar(total);
        let mut body = response.into_body();
        let mut reader = bar.wrap_read(body.as_reader());

        let mut file = std::fs::File::create(dest)
            .map_err(|e| crate::error::file_write_error(dest, e))?;
        std::io::copy(&mut reader, &mut file).map_err(|e| LadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        bar.finish_and_clear();

        Ok(())
    }
}

/// Shared `ureq` agent with request timeout configuration
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(TRANSFER_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

fn map_ureq_error(url: &str, err: ureq::Error) -> LadError {
    match err {
        ureq::Error::StatusCode(status) => LadError::TransferFailed {
            url: url.to_owned(),
            status,
        },
        other => LadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Byte-level progress bar for a transfer, spinner when the size is unknown
fn transfer_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    }
}
