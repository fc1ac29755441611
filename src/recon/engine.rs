//! The reconciliation engine.
//!
//! Orchestrates normalization, bill aggregation, and line-item matching,
//! computes the three top-level differences, and assembles the report. The
//! narrative summary comes from the injected generator, but only its text is
//! used: every number in the report is computed here.

use crate::api::Summarizer;
use crate::error::{Error, Result};
use crate::model::{
    Amount, BillFacts, ExtractedBill, ExtractedInvoice, Field, LineItemVerification,
    ReconciliationFacts, ReconciliationReport,
};
use crate::recon::{aggregate, duplicate_descriptions, match_line_items};
use tracing::{debug, warn};

/// Reconciles an invoice against its bills, narrating the summary through
/// the injected generator.
///
/// Fatal conditions: a required invoice numeric field that is absent or
/// unparseable, and any summarizer failure. Malformed line-item amounts are
/// not fatal; they degrade to 0.00.
pub async fn reconcile(
    invoice: &ExtractedInvoice,
    bills: &[ExtractedBill],
    summarizer: &dyn Summarizer,
) -> Result<ReconciliationReport> {
    let (facts, verification) = compute(invoice, bills)?;
    let response = summarizer.summarize(&facts).await?;
    Ok(ReconciliationReport {
        facts,
        reconciliation_summary: response.reconciliation_summary,
        line_item_verification: verification,
    })
}

/// Reconciles without calling the summary generator, rendering the summary
/// from a deterministic local template instead.
pub fn reconcile_offline(
    invoice: &ExtractedInvoice,
    bills: &[ExtractedBill],
) -> Result<ReconciliationReport> {
    let (facts, verification) = compute(invoice, bills)?;
    let reconciliation_summary = render_summary(&facts);
    Ok(ReconciliationReport {
        facts,
        reconciliation_summary,
        line_item_verification: verification,
    })
}

/// Runs the numeric part of the reconciliation: validation, aggregation,
/// per-bill matching, and the three differences.
fn compute(
    invoice: &ExtractedInvoice,
    bills: &[ExtractedBill],
) -> Result<(ReconciliationFacts, LineItemVerification)> {
    let invoice_subtotal_due =
        required_amount(&invoice.invoice_subtotal_due, "invoice_subtotal_due")?;
    let invoice_tax_due = required_amount(&invoice.invoice_tax_due, "invoice_tax_due")?;
    let invoice_total_due = required_amount(&invoice.invoice_total_due, "invoice_total_due")?;

    let totals = aggregate(bills);
    debug!(
        "aggregated {} bill(s): subtotal {} tax {} total {}",
        bills.len(),
        totals.subtotal,
        totals.tax,
        totals.total
    );

    // Bill-major accumulation: all outcomes for bill 1, then bill 2, etc.
    let mut matched_items = Vec::new();
    let mut mismatched_items = Vec::new();
    for bill in bills {
        let (matched, mismatched) = match_line_items(&invoice.line_items, &bill.line_items);
        matched_items.extend(matched);
        mismatched_items.extend(mismatched);
    }

    let duplicate_invoice_descriptions = duplicate_descriptions(&invoice.line_items);
    if !duplicate_invoice_descriptions.is_empty() {
        warn!(
            "invoice has duplicate line-item descriptions, first match wins: {:?}",
            duplicate_invoice_descriptions
        );
    }

    let subtotal_difference = (invoice_subtotal_due - totals.subtotal).rounded();
    let tax_difference = (invoice_tax_due - totals.tax).rounded();
    let total_difference = (invoice_total_due - totals.total).rounded();

    // Any non-zero difference counts, negative included: an over-payment is
    // as much a discrepancy as a shortfall.
    let discrepancies = !subtotal_difference.is_zero()
        || !tax_difference.is_zero()
        || !total_difference.is_zero();

    let facts = ReconciliationFacts {
        invoice_number: invoice.invoice_number.echo().to_string(),
        invoice_date: invoice.invoice_date.echo().to_string(),
        invoice_due_date: invoice.invoice_due_date.echo().to_string(),
        invoice_to: invoice.invoice_to.echo().to_string(),
        contact_number: invoice.contact_number.echo().to_string(),
        email: invoice.email.echo().to_string(),
        invoice_subtotal_due: invoice_subtotal_due.rounded(),
        invoice_tax_due: invoice_tax_due.rounded(),
        invoice_total_due: invoice_total_due.rounded(),
        bills: bills.iter().map(BillFacts::from_bill).collect(),
        subtotal_difference,
        tax_difference,
        total_difference,
        discrepancies,
    };

    let verification = LineItemVerification {
        discrepancy_found: !mismatched_items.is_empty(),
        matched_items,
        mismatched_items,
        duplicate_invoice_descriptions,
    };

    Ok((facts, verification))
}

/// Parses a required invoice monetary field. Absence is fatal because the
/// differences cannot be computed without it.
fn required_amount(field: &Field, name: &'static str) -> Result<Amount> {
    let raw = field.as_str().ok_or(Error::MissingField(name))?;
    Amount::parse(raw).map_err(|e| Error::InvalidInput(format!("{name}: {e}")))
}

/// Deterministic summary template used when no generator is in play. The
/// sentences mirror the generator's house style so reports read the same
/// either way.
pub(crate) fn render_summary(facts: &ReconciliationFacts) -> String {
    if !facts.discrepancies {
        return "All amounts match. No discrepancies found between the invoice and bill."
            .to_string();
    }

    let bill_subtotal: Amount = facts.bills.iter().map(|b| b.bill_subtotal_paid).sum();
    let bill_tax: Amount = facts.bills.iter().map(|b| b.bill_tax_paid).sum();
    let bill_total: Amount = facts.bills.iter().map(|b| b.bill_total_paid).sum();

    let mut sentences = Vec::new();
    if !facts.subtotal_difference.is_zero() {
        sentences.push(format!(
            "There is a discrepancy of {} in the subtotal. The invoice shows a subtotal of ${}, while the bills indicate a subtotal of ${}.",
            facts.subtotal_difference, facts.invoice_subtotal_due, bill_subtotal
        ));
    }
    if !facts.tax_difference.is_zero() {
        sentences.push(format!(
            "There is a discrepancy of {} in the tax. The invoice indicates tax due of ${}, whereas the bills show tax paid as ${}.",
            facts.tax_difference, facts.invoice_tax_due, bill_tax
        ));
    }
    sentences.push(format!(
        "The total amount differs by {}. According to the invoice, the total due is ${}, but the bills record a total paid of ${}.",
        facts.total_difference, facts.invoice_total_due, bill_total
    ));
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SummaryResponse, TestSummarizer};
    use crate::model::{BillLineItem, InvoiceLineItem, MatchResult};
    use async_trait::async_trait;

    fn invoice() -> ExtractedInvoice {
        ExtractedInvoice {
            invoice_number: Field::from("INV123456"),
            invoice_date: Field::from("19/08/2005"),
            invoice_due_date: Field::from("19/09/2005"),
            invoice_to: Field::from("ABC Corp"),
            contact_number: Field::NotAvailable,
            email: Field::from("abc@example.com"),
            invoice_subtotal_due: Field::from("$1,800.00"),
            invoice_tax_due: Field::from("$180.00"),
            invoice_total_due: Field::from("$1,980.00"),
            line_items: vec![InvoiceLineItem::new("Labor", "1800.00")],
        }
    }

    fn bill(subtotal: &str, tax: &str, total: &str, items: Vec<BillLineItem>) -> ExtractedBill {
        ExtractedBill {
            bill_number: Field::from("100"),
            bill_date: Field::from("6/26/2012"),
            bill_payment_date: Field::from("6/26/2012"),
            bill_paid_by: Field::from("Mr. X"),
            bill_subtotal_paid: Field::from(subtotal),
            bill_tax_paid: Field::from(tax),
            bill_total_paid: Field::from(total),
            line_items: items,
        }
    }

    fn matching_bill() -> ExtractedBill {
        bill(
            "$1,800.00",
            "$180.00",
            "$1,980.00",
            vec![BillLineItem::new("Labor", "1800.00")],
        )
    }

    #[test]
    fn test_matching_invoice_and_bill_has_no_discrepancies() {
        let report = reconcile_offline(&invoice(), &[matching_bill()]).unwrap();
        assert!(!report.facts.discrepancies);
        assert_eq!(report.facts.subtotal_difference.to_string(), "0.00");
        assert_eq!(report.facts.tax_difference.to_string(), "0.00");
        assert_eq!(report.facts.total_difference.to_string(), "0.00");
        assert_eq!(report.line_item_verification.matched_items.len(), 1);
        assert!(report.line_item_verification.mismatched_items.is_empty());
        assert!(!report.line_item_verification.discrepancy_found);
        assert_eq!(
            report.reconciliation_summary,
            "All amounts match. No discrepancies found between the invoice and bill."
        );
    }

    #[test]
    fn test_tax_shortfall_is_a_discrepancy() {
        let b = bill(
            "$1,800.00",
            "$150.00",
            "$1,980.00",
            vec![BillLineItem::new("Labor", "1800.00")],
        );
        let report = reconcile_offline(&invoice(), &[b]).unwrap();
        assert!(report.facts.discrepancies);
        assert_eq!(report.facts.tax_difference.to_string(), "30.00");
        assert_eq!(report.facts.subtotal_difference.to_string(), "0.00");
        assert!(report
            .reconciliation_summary
            .contains("There is a discrepancy of 30.00 in the tax."));
    }

    #[test]
    fn test_negative_difference_still_flags_discrepancy() {
        // Bills paid more than the invoice asked for.
        let b = bill(
            "$1,800.00",
            "$200.00",
            "$2,000.00",
            vec![BillLineItem::new("Labor", "1800.00")],
        );
        let report = reconcile_offline(&invoice(), &[b]).unwrap();
        assert!(report.facts.discrepancies);
        assert_eq!(report.facts.tax_difference.to_string(), "-20.00");
        assert_eq!(report.facts.total_difference.to_string(), "-20.00");
    }

    #[test]
    fn test_outcomes_are_bill_major_ordered() {
        let first = bill(
            "$900.00",
            "$90.00",
            "$990.00",
            vec![
                BillLineItem::new("Labor", "900"),
                BillLineItem::new("Gravel", "50"),
            ],
        );
        let second = bill(
            "$900.00",
            "$90.00",
            "$990.00",
            vec![BillLineItem::new("Sand", "25")],
        );
        let report = reconcile_offline(&invoice(), &[first, second]).unwrap();
        let descriptions: Vec<&str> = report
            .line_item_verification
            .mismatched_items
            .iter()
            .map(|m| match m {
                MatchResult::AmountMismatch { description, .. } => description.as_str(),
                MatchResult::Unmatched { description, .. } => description.as_str(),
                MatchResult::Matched { description, .. } => description.as_str(),
            })
            .collect();
        // Bill 1's items precede bill 2's, in intra-bill order.
        assert_eq!(descriptions, vec!["Labor", "Gravel", "Sand"]);
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let mut inv = invoice();
        inv.invoice_total_due = Field::NotAvailable;
        let err = reconcile_offline(&inv, &[matching_bill()]).unwrap_err();
        assert!(matches!(err, Error::MissingField("invoice_total_due")));
    }

    #[test]
    fn test_unparseable_required_field_is_fatal() {
        let mut inv = invoice();
        inv.invoice_tax_due = Field::from("eighteen dollars");
        let err = reconcile_offline(&inv, &[matching_bill()]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_empty_bill_list_reports_full_differences() {
        let report = reconcile_offline(&invoice(), &[]).unwrap();
        assert!(report.facts.discrepancies);
        assert_eq!(report.facts.total_difference.to_string(), "1980.00");
        assert!(report.line_item_verification.matched_items.is_empty());
    }

    #[test]
    fn test_duplicate_invoice_descriptions_are_surfaced() {
        let mut inv = invoice();
        inv.line_items.push(InvoiceLineItem::new("labor", "200"));
        let report = reconcile_offline(&inv, &[matching_bill()]).unwrap();
        assert_eq!(
            report.line_item_verification.duplicate_invoice_descriptions,
            vec!["labor".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reconcile_uses_generator_text_but_own_numbers() {
        // A generator that claims wildly wrong numbers in its echo. Only its
        // summary text may appear in the report.
        struct LyingSummarizer;

        #[async_trait]
        impl Summarizer for LyingSummarizer {
            async fn summarize(&self, _facts: &ReconciliationFacts) -> Result<SummaryResponse> {
                Ok(SummaryResponse {
                    reconciliation_summary: "The difference is $999,999.00.".to_string(),
                })
            }
        }

        let report = reconcile(&invoice(), &[matching_bill()], &LyingSummarizer)
            .await
            .unwrap();
        assert_eq!(report.reconciliation_summary, "The difference is $999,999.00.");
        assert_eq!(report.facts.total_difference.to_string(), "0.00");
        assert!(!report.facts.discrepancies);
    }

    #[tokio::test]
    async fn test_reconcile_with_test_summarizer_matches_offline() {
        let online = reconcile(&invoice(), &[matching_bill()], &TestSummarizer)
            .await
            .unwrap();
        let offline = reconcile_offline(&invoice(), &[matching_bill()]).unwrap();
        assert_eq!(online.reconciliation_summary, offline.reconciliation_summary);
    }

    #[tokio::test]
    async fn test_summarizer_failure_aborts_request() {
        struct BrokenSummarizer;

        #[async_trait]
        impl Summarizer for BrokenSummarizer {
            async fn summarize(&self, _facts: &ReconciliationFacts) -> Result<SummaryResponse> {
                Err(Error::UpstreamFormat("not json".to_string()))
            }
        }

        let err = reconcile(&invoice(), &[matching_bill()], &BrokenSummarizer)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamFormat(_)));
    }
}
