//! In-memory implementations of the collaborator traits for testing.
//!
//! Note: these are compiled even in the "production" version of this app so
//! that the whole flow can run, top-to-bottom, without an extraction service
//! or a language model behind it.

use crate::api::{Extractor, Summarizer, SummaryResponse};
use crate::error::{Error, Result};
use crate::model::{ExtractedBill, ExtractedInvoice, ReconciliationFacts};
use crate::recon::render_summary;
use async_trait::async_trait;

/// An `Extractor` that works without a document-understanding service.
///
/// It either returns canned records, or treats the "document text" as the
/// structured record's own JSON. Anything that does not parse is an
/// extraction failure, same as an unsupported document would be.
#[derive(Default)]
pub struct TestExtractor {
    invoice: Option<ExtractedInvoice>,
    bill: Option<ExtractedBill>,
}

impl TestExtractor {
    /// Always return `invoice` regardless of the document text.
    pub fn with_invoice(invoice: ExtractedInvoice) -> Self {
        Self {
            invoice: Some(invoice),
            bill: None,
        }
    }

    /// Always return `bill` regardless of the document text.
    pub fn with_bill(bill: ExtractedBill) -> Self {
        Self {
            invoice: None,
            bill: Some(bill),
        }
    }
}

#[async_trait]
impl Extractor for TestExtractor {
    async fn extract_invoice(&self, text: &str) -> Result<ExtractedInvoice> {
        if let Some(invoice) = &self.invoice {
            return Ok(invoice.clone());
        }
        serde_json::from_str(text)
            .map_err(|e| Error::Extraction(format!("document is not an invoice record: {e}")))
    }

    async fn extract_bill(&self, text: &str) -> Result<ExtractedBill> {
        if let Some(bill) = &self.bill {
            return Ok(bill.clone());
        }
        serde_json::from_str(text)
            .map_err(|e| Error::Extraction(format!("document is not a bill record: {e}")))
    }
}

/// A `Summarizer` that renders the deterministic local template instead of
/// calling a generator.
pub struct TestSummarizer;

#[async_trait]
impl Summarizer for TestSummarizer {
    async fn summarize(&self, facts: &ReconciliationFacts) -> Result<SummaryResponse> {
        Ok(SummaryResponse {
            reconciliation_summary: render_summary(facts),
        })
    }
}
