//! The structured record an invoice document is extracted into.

use crate::model::Field;
use serde::{Deserialize, Serialize};

/// The field set the extraction collaborator returns for an invoice
/// document. Every value is either a string from the document or "NA".
/// Immutable once returned to the reconciliation core.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ExtractedInvoice {
    pub invoice_number: Field,
    pub invoice_date: Field,
    pub invoice_due_date: Field,
    pub invoice_to: Field,
    pub contact_number: Field,
    pub email: Field,
    pub invoice_subtotal_due: Field,
    pub invoice_tax_due: Field,
    pub invoice_total_due: Field,
    pub line_items: Vec<InvoiceLineItem>,
}

/// A single billable entry on an invoice. The description is the sole match
/// key; quantity and rate are carried through for the report but never used
/// in matching.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct InvoiceLineItem {
    pub description: Field,
    pub hrs_or_quantity: Field,
    pub rate_or_cost: Field,
    pub line_total: Field,
}

impl InvoiceLineItem {
    pub fn new(description: &str, line_total: &str) -> Self {
        Self {
            description: Field::from(description),
            line_total: Field::from(line_total),
            ..Default::default()
        }
    }
}
