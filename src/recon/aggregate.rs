//! Aggregation of monetary totals across the bills for one invoice.

use crate::model::{Amount, ExtractedBill};

/// Summed subtotal, tax, and total across a set of bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BillTotals {
    pub subtotal: Amount,
    pub tax: Amount,
    pub total: Amount,
}

/// Sums the normalized subtotal/tax/total fields across all bills.
///
/// Plain commutative sums: the caller-supplied bill order does not affect the
/// result. An empty bill list yields all-zero totals. Absent or unparseable
/// totals contribute 0.00 rather than aborting.
pub fn aggregate(bills: &[ExtractedBill]) -> BillTotals {
    BillTotals {
        subtotal: bills
            .iter()
            .map(|b| Amount::lenient(&b.bill_subtotal_paid))
            .sum(),
        tax: bills.iter().map(|b| Amount::lenient(&b.bill_tax_paid)).sum(),
        total: bills
            .iter()
            .map(|b| Amount::lenient(&b.bill_total_paid))
            .sum(),
    }
}
