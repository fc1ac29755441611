//! Runtime configuration.
//!
//! Built once from the environment and passed into the components that need
//! it. There is no ambient global configuration state.

use std::time::Duration;
use url::Url;

const SUMMARIZER_URL: &str = "RECON_SUMMARIZER_URL";
const EXTRACTOR_URL: &str = "RECON_EXTRACTOR_URL";
const UPSTREAM_TIMEOUT_SECS: &str = "RECON_UPSTREAM_TIMEOUT_SECS";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Endpoints and timeouts for the upstream collaborators.
#[derive(Debug, Clone, Default)]
pub struct Config {
    summarizer_url: Option<Url>,
    extractor_url: Option<Url>,
    upstream_timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from environment variables. Unset or
    /// malformed endpoint URLs are treated as not configured.
    pub fn from_env() -> Self {
        Self {
            summarizer_url: env_url(SUMMARIZER_URL),
            extractor_url: env_url(EXTRACTOR_URL),
            upstream_timeout: std::env::var(UPSTREAM_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }

    pub fn new(summarizer_url: Option<Url>, extractor_url: Option<Url>) -> Self {
        Self {
            summarizer_url,
            extractor_url,
            upstream_timeout: None,
        }
    }

    pub fn summarizer_url(&self) -> Option<&Url> {
        self.summarizer_url.as_ref()
    }

    pub fn extractor_url(&self) -> Option<&Url> {
        self.extractor_url.as_ref()
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS))
    }
}

fn env_url(var: &str) -> Option<Url> {
    let raw = std::env::var(var).ok()?;
    match Url::parse(&raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("ignoring malformed {var}: {e}");
            None
        }
    }
}
