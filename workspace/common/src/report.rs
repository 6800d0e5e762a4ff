use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::window::MonthWindow;

/// How category summaries are ordered in a monthly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending by monthly budget target.
    Budget,
    /// Ascending lexicographic by category name.
    Name,
    /// Descending by the most recent matching transaction's creation time;
    /// categories with no transactions in the window sort last.
    RecentActivity,
    /// Descending by the computed spend total.
    #[default]
    AmountSpent,
}

/// Whether a sort key can be applied to the category rows before grouping,
/// or only once the aggregate exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStage {
    PreAggregation,
    PostAggregation,
}

impl SortKey {
    /// Resolve the aggregation stage this key sorts at. Budget and name are
    /// plain category columns; recent activity and spend totals only exist
    /// after the window's transactions have been grouped.
    pub fn stage(&self) -> SortStage {
        match self {
            SortKey::Budget | SortKey::Name => SortStage::PreAggregation,
            SortKey::RecentActivity | SortKey::AmountSpent => SortStage::PostAggregation,
        }
    }
}

/// Per-category spend total for one month window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub category_id: i32,
    pub name: String,
    pub icon: String,
    pub budget: Decimal,
    /// Sum of the window's matching transactions; zero when none matched.
    pub total_amount_spent: Decimal,
}

/// A single transaction as it appears in top-spend listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionSummary {
    pub transaction_id: i32,
    pub category_id: i32,
    pub source_id: Option<i32>,
    pub spent_on: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// The full monthly report returned by the reporting endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    /// The month window the report covers.
    pub window: MonthWindow,
    /// Per-category totals, ordered by the requested sort key.
    pub categories: Vec<CategorySummary>,
    /// Aggregate spend of the calendar month before the window.
    pub previous_month_total: Decimal,
    /// Largest transactions of the window, largest first.
    pub top_transactions: Vec<TransactionSummary>,
}
