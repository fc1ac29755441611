//! Types that represent the core data model, such as `ExtractedInvoice`,
//! `ExtractedBill`, and the reconciliation report.

mod amount;
mod bill;
mod field;
mod invoice;
mod report;

pub use amount::{Amount, AmountParseError};
pub use bill::{BillLineItem, ExtractedBill};
pub use field::Field;
pub use invoice::{ExtractedInvoice, InvoiceLineItem};
pub use report::{
    BillFacts, LineItemVerification, MatchResult, MismatchReason, ReconcileResponse,
    ReconciliationFacts, ReconciliationReport,
};
