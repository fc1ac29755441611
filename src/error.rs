//! Error taxonomy for reconciliation requests.
//!
//! Validation and structural errors abort the whole request so that a report
//! with silently-wrong numbers is never returned. Per-line-item amount parse
//! failures are absorbed by the normalizer instead of appearing here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A non-string value was supplied where a currency string or "NA" was
    /// expected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required invoice numeric field (subtotal/tax/total due) is absent.
    #[error("required invoice field '{0}' is missing")]
    MissingField(&'static str),

    /// The extraction collaborator could not produce a structured record.
    #[error("document extraction failed: {0}")]
    Extraction(String),

    /// The summary generator returned output that does not parse into the
    /// expected structure. There is no safe default summary to substitute.
    #[error("summary generator returned malformed output: {0}")]
    UpstreamFormat(String),

    /// A collaborator call exceeded the configured deadline.
    #[error("upstream call to {0} timed out")]
    UpstreamTimeout(String),

    /// A collaborator failed at the transport level.
    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
