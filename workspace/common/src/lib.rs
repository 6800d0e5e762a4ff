//! Common transport-layer types shared between the reporting engine and the
//! HTTP handlers. These structs are the wire shapes of the monthly report
//! endpoints, so clients can deserialize responses without duplicating them.

mod report;
mod window;

pub use report::{CategorySummary, MonthlyReport, SortKey, SortStage, TransactionSummary};
pub use window::MonthWindow;
