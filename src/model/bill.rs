//! The structured record a bill document is extracted into.

use crate::model::Field;
use serde::{Deserialize, Serialize};

/// The field set the extraction collaborator returns for a bill document.
/// One invoice reconciles against an ordered sequence of these; the caller's
/// order is preserved for report ordering.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ExtractedBill {
    pub bill_number: Field,
    pub bill_date: Field,
    pub bill_payment_date: Field,
    pub bill_paid_by: Field,
    pub bill_subtotal_paid: Field,
    pub bill_tax_paid: Field,
    pub bill_total_paid: Field,
    pub line_items: Vec<BillLineItem>,
}

/// A single billable entry on a bill.
///
/// The extractor is inconsistent about the amount key's capitalization
/// ("amount" vs "Amount"), so both spellings are accepted.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct BillLineItem {
    pub description: Field,
    #[serde(alias = "Amount")]
    pub amount: Field,
}

impl BillLineItem {
    pub fn new(description: &str, amount: &str) -> Self {
        Self {
            description: Field::from(description),
            amount: Field::from(amount),
        }
    }
}
