use chrono::NaiveDate;
use common::MonthWindow;
use model::entities::transaction;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument};

use crate::error::Result;

/// All non-deleted transactions of one user whose calendar date falls inside
/// the window, in creation order. Both window days are inclusive.
pub async fn transactions_in_window(
    db: &DatabaseConnection,
    user_id: i32,
    window: &MonthWindow,
) -> Result<Vec<transaction::Model>> {
    let transactions = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::DeletedAt.is_null())
        .filter(transaction::Column::Date.between(window.first_day(), window.last_day()))
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    debug!(
        "Fetched {} transactions for user {} between {} and {}",
        transactions.len(),
        user_id,
        window.first_day(),
        window.last_day()
    );

    Ok(transactions)
}

/// Sums the user's spend in the calendar month before the reference date's
/// month. Returns zero, not an error, when no transactions exist there.
#[instrument(skip(db))]
pub async fn previous_month_total(
    db: &DatabaseConnection,
    user_id: i32,
    reference: NaiveDate,
) -> Result<Decimal> {
    let window = MonthWindow::preceding(reference);
    let transactions = transactions_in_window(db, user_id, &window).await?;

    Ok(transactions.iter().map(|tx| tx.amount).sum())
}
