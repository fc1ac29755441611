//! Collaborator boundary: document extraction and narrative summary
//! generation live behind these traits. The core never parses raw documents
//! or talks to a language model directly; it calls whatever implementation
//! was injected.

mod http;
mod test_client;

pub use http::{HttpExtractor, HttpSummarizer};
pub use test_client::{TestExtractor, TestSummarizer};

use crate::error::{Error, Result};
use crate::model::{ExtractedBill, ExtractedInvoice, ReconciliationFacts};
use crate::Config;
use async_trait::async_trait;
use serde::Deserialize;

/// Turns raw document text into a structured record.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract_invoice(&self, text: &str) -> Result<ExtractedInvoice>;
    async fn extract_bill(&self, text: &str) -> Result<ExtractedBill>;
}

/// Produces the natural-language summary for precomputed reconciliation
/// facts. Called at most once per reconciliation. The phrasing may vary
/// between calls; the numbers it is given never do.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, facts: &ReconciliationFacts) -> Result<SummaryResponse>;
}

/// What the summary generator must return. Generators tend to echo the
/// input fields back; everything except the summary text is ignored because
/// the engine's own numbers are authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    pub reconciliation_summary: String,
}

/// Whether to call real upstream services or the in-crate test doubles.
///
/// When `RECON_IN_TEST_MODE` is set and non-empty, the whole app runs
/// without any upstream endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var("RECON_IN_TEST_MODE") {
            Ok(v) if !v.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Creates the summarizer for `mode`.
pub fn summarizer(config: &Config, mode: Mode) -> Result<Box<dyn Summarizer>> {
    match mode {
        Mode::Test => Ok(Box::new(TestSummarizer)),
        Mode::Live => {
            let url = config.summarizer_url().ok_or_else(|| {
                Error::UpstreamUnavailable("no summarizer endpoint configured".to_string())
            })?;
            Ok(Box::new(HttpSummarizer::new(url.clone(), config.upstream_timeout())))
        }
    }
}

/// Creates the extractor for `mode`.
pub fn extractor(config: &Config, mode: Mode) -> Result<Box<dyn Extractor>> {
    match mode {
        Mode::Test => Ok(Box::new(TestExtractor::default())),
        Mode::Live => {
            let url = config.extractor_url().ok_or_else(|| {
                Error::UpstreamUnavailable("no extractor endpoint configured".to_string())
            })?;
            Ok(Box::new(HttpExtractor::new(url.clone(), config.upstream_timeout())))
        }
    }
}
