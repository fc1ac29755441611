//! The reconciliation core: bill aggregation, line-item matching, and the
//! engine that assembles discrepancy reports.

mod aggregate;
mod engine;
mod matcher;

pub use aggregate::{aggregate, BillTotals};
pub use engine::{reconcile, reconcile_offline};
pub use matcher::{duplicate_descriptions, match_line_items};

pub(crate) use engine::render_summary;
