//! The monthly reporting engine: read-only aggregation of one user's spend
//! over a calendar-month window. It never mutates stored entities and holds
//! no state between calls; identical inputs over identical stored data
//! always produce identical output.

pub mod error;
pub mod monthly;
pub mod spend;
pub mod top;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

use common::{MonthWindow, MonthlyReport, SortKey, TransactionSummary};
use sea_orm::DatabaseConnection;
use tracing::instrument;

pub use error::{ReportError, Result};

/// Builds the complete monthly report for one user: per-category totals in
/// the requested order, the prior month's aggregate spend, and the window's
/// largest transactions.
///
/// `reference` is an optional `YYYY-MM-DD` string; a missing one means
/// "today". `limit` caps the top-transaction listing and defaults to
/// [`top::DEFAULT_TOP_N`].
#[instrument(skip(db))]
pub async fn monthly_report(
    db: &DatabaseConnection,
    user_id: i32,
    reference: Option<&str>,
    sort_key: SortKey,
    limit: Option<usize>,
) -> Result<MonthlyReport> {
    let reference = window::resolve_reference_date(reference)?;
    let window = MonthWindow::containing(reference);

    let categories = spend::aggregate_category_spend(db, user_id, &window, sort_key).await?;
    let previous_month_total = monthly::previous_month_total(db, user_id, reference).await?;

    let transactions = monthly::transactions_in_window(db, user_id, &window).await?;
    let top_transactions = top::top_n(transactions, limit, |tx| tx.amount)?
        .into_iter()
        .map(|tx| TransactionSummary {
            transaction_id: tx.id,
            category_id: tx.category_id,
            source_id: tx.source_id,
            spent_on: tx.spent_on,
            amount: tx.amount,
            date: tx.date,
        })
        .collect();

    Ok(MonthlyReport {
        window,
        categories,
        previous_month_total,
        top_transactions,
    })
}
