//! The `reconcile` command: load the invoice and bill records, run the
//! engine, and return the response envelope for printing.

use crate::api::{self, Mode};
use crate::args::ReconcileArgs;
use crate::error::{Error, Result};
use crate::model::{ExtractedBill, ExtractedInvoice, ReconcileResponse};
use crate::recon;
use crate::Config;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

pub async fn reconcile(config: &Config, mode: Mode, args: &ReconcileArgs) -> Result<ReconcileResponse> {
    let invoice_text = read(args.invoice()).await?;
    let bill_texts = {
        let mut texts = Vec::with_capacity(args.bills().len());
        for path in args.bills() {
            texts.push(read(path).await?);
        }
        texts
    };

    let (invoice, bills) = if args.extract() {
        extract_records(config, mode, &invoice_text, &bill_texts).await?
    } else {
        let invoice = parse_record(&invoice_text, args.invoice())?;
        let bills = args
            .bills()
            .iter()
            .zip(&bill_texts)
            .map(|(path, text)| parse_record(text, path))
            .collect::<Result<Vec<ExtractedBill>>>()?;
        (invoice, bills)
    };
    debug!("loaded invoice and {} bill(s)", bills.len());

    let result = if args.no_summary() {
        recon::reconcile_offline(&invoice, &bills)?
    } else {
        let summarizer = api::summarizer(config, mode)?;
        recon::reconcile(&invoice, &bills, summarizer.as_ref()).await?
    };
    info!(
        "reconciliation complete, discrepancies: {}",
        result.facts.discrepancies
    );

    Ok(ReconcileResponse {
        invoice_details: invoice,
        bill_details: bills,
        result,
    })
}

/// Sends raw document text through the extraction collaborator.
async fn extract_records(
    config: &Config,
    mode: Mode,
    invoice_text: &str,
    bill_texts: &[String],
) -> Result<(ExtractedInvoice, Vec<ExtractedBill>)> {
    let extractor = api::extractor(config, mode)?;
    let invoice = extractor.extract_invoice(invoice_text).await?;
    let mut bills = Vec::with_capacity(bill_texts.len());
    for text in bill_texts {
        bills.push(extractor.extract_bill(text).await?);
    }
    Ok((invoice, bills))
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(Error::from)
}

/// Parses an already-extracted record file. A record that violates the
/// extractor contract (wrong shape, non-string field values) is an input
/// error, not an IO error.
fn parse_record<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))
}
