//! Report types produced by a reconciliation run.

use crate::model::{Amount, ExtractedBill, ExtractedInvoice};
use serde::Serialize;

/// The outcome for one bill line item. Every bill line item produces exactly
/// one of these. Serialized untagged so each variant is a flat JSON object,
/// matching the report consumer's expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MatchResult {
    /// Description found on the invoice and amounts equal.
    Matched { description: String, amount: Amount },
    /// Description found on the invoice but the amounts differ.
    AmountMismatch {
        description: String,
        bill_amount: Amount,
        invoice_amount: Amount,
        reason: MismatchReason,
    },
    /// No invoice item shares this description, or the bill item had none.
    Unmatched {
        description: String,
        bill_amount: Amount,
        reason: MismatchReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MismatchReason {
    #[serde(rename = "amount mismatch")]
    AmountMismatch,
    #[serde(rename = "not found")]
    NotFound,
    #[serde(rename = "missing description")]
    MissingDescription,
}

/// Line-item outcomes accumulated across all bills, bill-major.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LineItemVerification {
    pub matched_items: Vec<MatchResult>,
    pub mismatched_items: Vec<MatchResult>,
    pub discrepancy_found: bool,
    /// Normalized descriptions that occur more than once on the invoice
    /// side. Matching still uses first-match order; this is a diagnostic.
    pub duplicate_invoice_descriptions: Vec<String>,
}

/// Echoed fields for one bill, with its totals normalized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BillFacts {
    pub bill_number: String,
    pub bill_date: String,
    pub bill_payment_date: String,
    pub bill_paid_by: String,
    pub bill_subtotal_paid: Amount,
    pub bill_tax_paid: Amount,
    pub bill_total_paid: Amount,
}

impl BillFacts {
    pub fn from_bill(bill: &ExtractedBill) -> Self {
        Self {
            bill_number: bill.bill_number.echo().to_string(),
            bill_date: bill.bill_date.echo().to_string(),
            bill_payment_date: bill.bill_payment_date.echo().to_string(),
            bill_paid_by: bill.bill_paid_by.echo().to_string(),
            bill_subtotal_paid: Amount::lenient(&bill.bill_subtotal_paid).rounded(),
            bill_tax_paid: Amount::lenient(&bill.bill_tax_paid).rounded(),
            bill_total_paid: Amount::lenient(&bill.bill_total_paid).rounded(),
        }
    }
}

/// The computed, authoritative numeric facts of a reconciliation.
///
/// This is what gets handed to the narrative-summary generator. The
/// generator is only ever asked to phrase these numbers, never to compute
/// them; whatever numbers it echoes back are discarded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconciliationFacts {
    pub invoice_number: String,
    pub invoice_date: String,
    pub invoice_due_date: String,
    pub invoice_to: String,
    pub contact_number: String,
    pub email: String,
    pub invoice_subtotal_due: Amount,
    pub invoice_tax_due: Amount,
    pub invoice_total_due: Amount,
    pub bills: Vec<BillFacts>,
    pub subtotal_difference: Amount,
    pub tax_difference: Amount,
    pub total_difference: Amount,
    pub discrepancies: bool,
}

/// The full report for one reconciliation request. Request-scoped; has no
/// lifecycle beyond the response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconciliationReport {
    #[serde(flatten)]
    pub facts: ReconciliationFacts,
    pub reconciliation_summary: String,
    pub line_item_verification: LineItemVerification,
}

/// The response envelope the report consumer receives: the raw extracted
/// records alongside the reconciliation result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileResponse {
    pub invoice_details: ExtractedInvoice,
    pub bill_details: Vec<ExtractedBill>,
    pub result: ReconciliationReport,
}
