//! Pairs bill line items against invoice line items by description.
//!
//! Descriptions are the sole join key, compared case-insensitively after
//! trimming. No fuzzy or partial matching. The scan is linear first-match:
//! when the invoice lists the same description twice, the first occurrence
//! always wins. That policy is deliberate (see `duplicate_descriptions` for
//! the diagnostic that surfaces such invoices).

use crate::model::{Amount, BillLineItem, Field, InvoiceLineItem, MatchResult, MismatchReason};

/// Trims and lowercases a description for comparison. Absent descriptions
/// normalize to the empty string.
fn normalize_description(field: &Field) -> String {
    field.as_str().unwrap_or("").trim().to_lowercase()
}

/// Matches each bill line item against the invoice's line items.
///
/// Returns `(matched, mismatched)`. Every bill line item lands in exactly one
/// of the two: `Matched` in the first, `AmountMismatch` or `Unmatched` in the
/// second. Amount equality is checked after rounding both sides to two
/// decimal places; an unparseable amount is treated as 0.00 so one bad line
/// item never aborts the run.
pub fn match_line_items(
    invoice_items: &[InvoiceLineItem],
    bill_items: &[BillLineItem],
) -> (Vec<MatchResult>, Vec<MatchResult>) {
    let mut matched = Vec::new();
    let mut mismatched = Vec::new();

    for bill_item in bill_items {
        let bill_desc = normalize_description(&bill_item.description);
        let bill_amount = Amount::lenient(&bill_item.amount).rounded();

        if bill_desc.is_empty() {
            mismatched.push(MatchResult::Unmatched {
                description: bill_item.description.echo().to_string(),
                bill_amount,
                reason: MismatchReason::MissingDescription,
            });
            continue;
        }

        let found = invoice_items
            .iter()
            .find(|item| normalize_description(&item.description) == bill_desc);

        match found {
            Some(invoice_item) => {
                let invoice_amount = Amount::lenient(&invoice_item.line_total).rounded();
                if bill_amount == invoice_amount {
                    matched.push(MatchResult::Matched {
                        description: bill_item.description.echo().to_string(),
                        amount: bill_amount,
                    });
                } else {
                    mismatched.push(MatchResult::AmountMismatch {
                        description: bill_item.description.echo().to_string(),
                        bill_amount,
                        invoice_amount,
                        reason: MismatchReason::AmountMismatch,
                    });
                }
            }
            None => {
                mismatched.push(MatchResult::Unmatched {
                    description: bill_item.description.echo().to_string(),
                    bill_amount,
                    reason: MismatchReason::NotFound,
                });
            }
        }
    }

    (matched, mismatched)
}

/// Returns the normalized descriptions that appear more than once among the
/// invoice's line items, in first-occurrence order. Duplicates are invisible
/// to the first-match scan, so they are reported as a diagnostic.
pub fn duplicate_descriptions(invoice_items: &[InvoiceLineItem]) -> Vec<String> {
    let normalized: Vec<String> = invoice_items
        .iter()
        .map(|item| normalize_description(&item.description))
        .filter(|d| !d.is_empty())
        .collect();

    let mut duplicates = Vec::new();
    for (ix, desc) in normalized.iter().enumerate() {
        let first_at = normalized.iter().position(|d| d == desc);
        let count = normalized.iter().filter(|d| *d == desc).count();
        if count > 1 && first_at == Some(ix) {
            duplicates.push(desc.clone());
        }
    }
    duplicates
}
