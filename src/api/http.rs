//! HTTP-backed implementations of the collaborator traits.
//!
//! Both adapters POST JSON to a configured endpoint and parse a JSON
//! response. Each call is a single attempt with a deadline; retries are left
//! to the caller since upstream phrasing is not idempotent.

use crate::api::{Extractor, Summarizer, SummaryResponse};
use crate::error::{Error, Result};
use crate::model::{ExtractedBill, ExtractedInvoice, ReconciliationFacts};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Calls a field-extraction service: `{ "kind": …, "text": … }` in, an
/// extracted record out.
pub struct HttpExtractor {
    url: Url,
    timeout: Duration,
    client: Client,
}

impl HttpExtractor {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            url,
            timeout,
            client: Client::new(),
        }
    }

    async fn extract<T: DeserializeOwned>(&self, kind: &str, text: &str) -> Result<T> {
        trace!("extracting {kind} via {}", self.url);
        let body = serde_json::json!({ "kind": kind, "text": text });
        let response = post_json(&self.client, &self.url, self.timeout, &body, "extractor").await?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| Error::Extraction(format!("malformed {kind} record: {e}"))),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(Error::Extraction(
                read_error_body(response).await,
            )),
            status => Err(Error::UpstreamUnavailable(format!(
                "extractor returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract_invoice(&self, text: &str) -> Result<ExtractedInvoice> {
        self.extract("invoice", text).await
    }

    async fn extract_bill(&self, text: &str) -> Result<ExtractedBill> {
        self.extract("bill", text).await
    }
}

/// Calls a narrative-summary service with precomputed facts.
pub struct HttpSummarizer {
    url: Url,
    timeout: Duration,
    client: Client,
}

impl HttpSummarizer {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            url,
            timeout,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, facts: &ReconciliationFacts) -> Result<SummaryResponse> {
        trace!("requesting summary via {}", self.url);
        let response = post_json(&self.client, &self.url, self.timeout, facts, "summarizer").await?;

        if !response.status().is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "summarizer returned {}",
                response.status()
            )));
        }

        // A summary that does not parse cannot be guessed at; this is fatal
        // for the request rather than silently substituted.
        response
            .json::<SummaryResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(e.to_string()))
    }
}

/// POSTs `body` as JSON, mapping transport failures to the upstream error
/// kinds.
async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &Url,
    timeout: Duration,
    body: &B,
    upstream: &str,
) -> Result<Response> {
    client
        .post(url.clone())
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                Error::UpstreamTimeout(upstream.to_string())
            } else {
                Error::UpstreamUnavailable(format!("{upstream}: {e}"))
            }
        })
}

async fn read_error_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "unreadable error body".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn facts() -> ReconciliationFacts {
        ReconciliationFacts {
            invoice_number: "INV123456".to_string(),
            invoice_date: "19/08/2005".to_string(),
            invoice_due_date: "NA".to_string(),
            invoice_to: "ABC Corp".to_string(),
            contact_number: "NA".to_string(),
            email: "abc@example.com".to_string(),
            invoice_subtotal_due: "1800".parse().unwrap(),
            invoice_tax_due: "180".parse().unwrap(),
            invoice_total_due: "1980".parse().unwrap(),
            bills: vec![],
            subtotal_difference: "1800".parse().unwrap(),
            tax_difference: "180".parse().unwrap(),
            total_difference: "1980".parse().unwrap(),
            discrepancies: true,
        }
    }

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&server.url(path)).unwrap()
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/summarize")
                .json_body_partial(r#"{"invoice_number": "INV123456"}"#);
            then.status(200).json_body(serde_json::json!({
                "invoice_number": "INV123456",
                "total_difference": "$0.00",
                "reconciliation_summary": "Discrepancies found between the given invoice and bills."
            }));
        });

        let summarizer = HttpSummarizer::new(url(&server, "/summarize"), Duration::from_secs(5));
        let response = summarizer.summarize(&facts()).await.unwrap();

        mock.assert();
        assert_eq!(
            response.reconciliation_summary,
            "Discrepancies found between the given invoice and bills."
        );
    }

    #[tokio::test]
    async fn test_summarize_malformed_body_is_format_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/summarize");
            then.status(200).body("```json not even json");
        });

        let summarizer = HttpSummarizer::new(url(&server, "/summarize"), Duration::from_secs(5));
        let err = summarizer.summarize(&facts()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamFormat(_)));
    }

    #[tokio::test]
    async fn test_summarize_server_error_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/summarize");
            then.status(500);
        });

        let summarizer = HttpSummarizer::new(url(&server, "/summarize"), Duration::from_secs(5));
        let err = summarizer.summarize(&facts()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_summarize_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/summarize");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(serde_json::json!({"reconciliation_summary": "late"}));
        });

        let summarizer =
            HttpSummarizer::new(url(&server, "/summarize"), Duration::from_millis(100));
        let err = summarizer.summarize(&facts()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamTimeout(_)));
    }

    #[tokio::test]
    async fn test_extract_invoice_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/extract")
                .json_body_partial(r#"{"kind": "invoice"}"#);
            then.status(200).json_body(serde_json::json!({
                "invoice_number": "10001",
                "invoice_date": "6/15/2024",
                "invoice_due_date": "30 days",
                "invoice_to": "Jash Enterprises",
                "contact_number": "NA",
                "email": "NA",
                "invoice_subtotal_due": "$30,000.00",
                "invoice_tax_due": "$3,000.00",
                "invoice_total_due": "$33,000.00",
                "line_items": []
            }));
        });

        let extractor = HttpExtractor::new(url(&server, "/extract"), Duration::from_secs(5));
        let invoice = extractor.extract_invoice("raw document text").await.unwrap();

        mock.assert();
        assert_eq!(invoice.invoice_number.echo(), "10001");
        assert!(!invoice.email.is_available());
    }

    #[tokio::test]
    async fn test_extract_unparseable_document_is_extraction_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/extract");
            then.status(422).body("unsupported file type");
        });

        let extractor = HttpExtractor::new(url(&server, "/extract"), Duration::from_secs(5));
        let err = extractor.extract_bill("\u{0}\u{0}\u{0}").await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
