use std::collections::HashMap;

use chrono::NaiveDateTime;
use common::{CategorySummary, MonthWindow, SortKey, SortStage};
use model::entities::category;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::monthly::transactions_in_window;

/// Computes per-category spend totals for one user and one month window.
///
/// Every non-deleted category the user owned on-or-before the window end
/// appears in the result, including those with no matching transactions
/// (their total is zero). The sort key decides the ordering; its stage
/// decides whether the sort happens on the category rows before grouping or
/// on the summaries after, since spend totals and recent activity only
/// exist once the window's transactions have been grouped.
///
/// All sorts are stable, so ties keep creation (id) order.
#[instrument(skip(db, window))]
pub async fn aggregate_category_spend(
    db: &DatabaseConnection,
    user_id: i32,
    window: &MonthWindow,
    sort_key: SortKey,
) -> Result<Vec<CategorySummary>> {
    // Categories created after the window end could not have had
    // transactions inside it.
    let mut categories = category::Entity::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::DeletedAt.is_null())
        .filter(category::Column::CreatedAt.lte(window.end))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;

    debug!(
        "Fetched {} categories for user {} in window starting {}",
        categories.len(),
        user_id,
        window.first_day()
    );

    if sort_key.stage() == SortStage::PreAggregation {
        sort_categories(&mut categories, sort_key);
    }

    let transactions = transactions_in_window(db, user_id, window).await?;
    debug!("Grouping {} transactions", transactions.len());

    let mut totals: HashMap<i32, Decimal> = HashMap::new();
    let mut latest_activity: HashMap<i32, NaiveDateTime> = HashMap::new();
    for tx in &transactions {
        *totals.entry(tx.category_id).or_insert(Decimal::ZERO) += tx.amount;
        latest_activity
            .entry(tx.category_id)
            .and_modify(|at| *at = (*at).max(tx.created_at))
            .or_insert(tx.created_at);
    }

    let mut summaries: Vec<CategorySummary> = categories
        .into_iter()
        .map(|cat| CategorySummary {
            total_amount_spent: totals.get(&cat.id).copied().unwrap_or(Decimal::ZERO),
            category_id: cat.id,
            name: cat.name,
            icon: cat.icon,
            budget: cat.budget,
        })
        .collect();

    if sort_key.stage() == SortStage::PostAggregation {
        sort_summaries(&mut summaries, &latest_activity, sort_key);
    }

    info!(
        "Aggregated {} category summaries for user {}",
        summaries.len(),
        user_id
    );
    Ok(summaries)
}

fn sort_categories(categories: &mut [category::Model], sort_key: SortKey) {
    match sort_key {
        SortKey::Budget => categories.sort_by(|a, b| b.budget.cmp(&a.budget)),
        SortKey::Name => categories.sort_by(|a, b| a.name.cmp(&b.name)),
        // Post-aggregation keys never reach this path.
        SortKey::RecentActivity | SortKey::AmountSpent => {}
    }
}

fn sort_summaries(
    summaries: &mut [CategorySummary],
    latest_activity: &HashMap<i32, NaiveDateTime>,
    sort_key: SortKey,
) {
    match sort_key {
        SortKey::AmountSpent => {
            summaries.sort_by(|a, b| b.total_amount_spent.cmp(&a.total_amount_spent))
        }
        SortKey::RecentActivity => {
            // None orders below every Some, so categories without matching
            // transactions sort last under the descending comparison.
            summaries.sort_by(|a, b| {
                let a_at = latest_activity.get(&a.category_id);
                let b_at = latest_activity.get(&b.category_id);
                b_at.cmp(&a_at)
            })
        }
        SortKey::Budget | SortKey::Name => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn march_2024() -> MonthWindow {
        MonthWindow::containing(ymd(2024, 3, 15))
    }

    #[tokio::test]
    async fn test_totals_per_category_with_zero_kept() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        let food = seed_category(&db, user.id, "Food", dec(500), created).await;
        let travel = seed_category(&db, user.id, "Travel", dec(200), created).await;

        seed_transaction(&db, user.id, food.id, dec(100), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        seed_transaction(&db, user.id, food.id, dec(50), ymd(2024, 3, 20), at_noon(ymd(2024, 3, 20))).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category_id, food.id);
        assert_eq!(summaries[0].total_amount_spent, dec(150));
        assert_eq!(summaries[1].category_id, travel.id);
        assert_eq!(summaries[1].total_amount_spent, dec(0));
    }

    #[tokio::test]
    async fn test_no_transactions_yields_all_zero_not_empty() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        seed_category(&db, user.id, "Food", dec(500), created).await;
        seed_category(&db, user.id, "Travel", dec(200), created).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.total_amount_spent == dec(0)));
    }

    #[tokio::test]
    async fn test_no_categories_yields_empty_not_error() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::Name)
                .await
                .unwrap();

        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_window_boundaries_are_inclusive() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));
        let food = seed_category(&db, user.id, "Food", dec(500), created).await;

        // First and last day of March count; either side does not.
        seed_transaction(&db, user.id, food.id, dec(10), ymd(2024, 3, 1), at_noon(ymd(2024, 3, 1))).await;
        seed_transaction(&db, user.id, food.id, dec(20), ymd(2024, 3, 31), at_noon(ymd(2024, 3, 31))).await;
        seed_transaction(&db, user.id, food.id, dec(5), ymd(2024, 2, 29), at_noon(ymd(2024, 2, 29))).await;
        seed_transaction(&db, user.id, food.id, dec(7), ymd(2024, 4, 1), at_noon(ymd(2024, 4, 1))).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        assert_eq!(summaries[0].total_amount_spent, dec(30));
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_excluded() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        let food = seed_category(&db, user.id, "Food", dec(500), created).await;
        let ghost = seed_category(&db, user.id, "Ghost", dec(900), created).await;

        seed_transaction(&db, user.id, food.id, dec(100), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        let gone =
            seed_transaction(&db, user.id, food.id, dec(40), ymd(2024, 3, 6), at_noon(ymd(2024, 3, 6))).await;

        soft_delete_transaction(&db, gone).await;
        soft_delete_category(&db, ghost).await;

        for key in [SortKey::Budget, SortKey::Name, SortKey::RecentActivity, SortKey::AmountSpent] {
            let summaries = aggregate_category_spend(&db, user.id, &march_2024(), key)
                .await
                .unwrap();

            assert_eq!(summaries.len(), 1, "sort key {key:?}");
            assert_eq!(summaries[0].name, "Food");
            assert_eq!(summaries[0].total_amount_spent, dec(100));
        }
    }

    #[tokio::test]
    async fn test_category_created_after_window_is_excluded() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;

        seed_category(&db, user.id, "Food", dec(500), at_noon(ymd(2024, 1, 1))).await;
        seed_category(&db, user.id, "Later", dec(100), at_noon(ymd(2024, 4, 2))).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::Name)
                .await
                .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Food");
    }

    #[tokio::test]
    async fn test_aggregation_is_scoped_to_one_user() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;
        let created = at_noon(ymd(2024, 1, 1));

        let a_food = seed_category(&db, alice.id, "Food", dec(500), created).await;
        let b_food = seed_category(&db, bob.id, "Food", dec(500), created).await;

        seed_transaction(&db, alice.id, a_food.id, dec(10), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        seed_transaction(&db, bob.id, b_food.id, dec(999), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;

        let summaries =
            aggregate_category_spend(&db, alice.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].category_id, a_food.id);
        assert_eq!(summaries[0].total_amount_spent, dec(10));
    }

    #[tokio::test]
    async fn test_sort_by_budget_and_name() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        seed_category(&db, user.id, "Travel", dec(200), created).await;
        seed_category(&db, user.id, "Food", dec(500), created).await;
        seed_category(&db, user.id, "Rent", dec(1200), created).await;

        let by_budget =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::Budget)
                .await
                .unwrap();
        let names: Vec<&str> = by_budget.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Food", "Travel"]);

        let by_name = aggregate_category_spend(&db, user.id, &march_2024(), SortKey::Name)
            .await
            .unwrap();
        let names: Vec<&str> = by_name.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Rent", "Travel"]);
    }

    #[tokio::test]
    async fn test_recent_activity_sorts_inactive_categories_last() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        let food = seed_category(&db, user.id, "Food", dec(500), created).await;
        seed_category(&db, user.id, "Idle", dec(300), created).await;
        let travel = seed_category(&db, user.id, "Travel", dec(200), created).await;

        // Travel was touched after Food.
        seed_transaction(&db, user.id, food.id, dec(10), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        seed_transaction(&db, user.id, travel.id, dec(10), ymd(2024, 3, 6), at_noon(ymd(2024, 3, 6))).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::RecentActivity)
                .await
                .unwrap();

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Food", "Idle"]);
    }

    #[tokio::test]
    async fn test_sort_key_changes_ordering_never_membership() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        let food = seed_category(&db, user.id, "Food", dec(100), created).await;
        let travel = seed_category(&db, user.id, "Travel", dec(900), created).await;

        seed_transaction(&db, user.id, food.id, dec(80), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        seed_transaction(&db, user.id, travel.id, dec(20), ymd(2024, 3, 6), at_noon(ymd(2024, 3, 6))).await;

        let by_budget =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::Budget)
                .await
                .unwrap();
        let by_spend =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        // Opposite orderings of the same rows and totals.
        assert_eq!(by_budget.first().unwrap().name, "Travel");
        assert_eq!(by_spend.first().unwrap().name, "Food");

        let mut budget_sorted = by_budget.clone();
        budget_sorted.sort_by_key(|s| s.category_id);
        let mut spend_sorted = by_spend.clone();
        spend_sorted.sort_by_key(|s| s.category_id);
        assert_eq!(budget_sorted, spend_sorted);
    }

    #[tokio::test]
    async fn test_amount_spent_ties_keep_creation_order() {
        let db = setup_db().await;
        let user = seed_user(&db, "alice").await;
        let created = at_noon(ymd(2024, 1, 1));

        let first = seed_category(&db, user.id, "Zeta", dec(100), created).await;
        let second = seed_category(&db, user.id, "Alpha", dec(100), created).await;

        seed_transaction(&db, user.id, first.id, dec(50), ymd(2024, 3, 5), at_noon(ymd(2024, 3, 5))).await;
        seed_transaction(&db, user.id, second.id, dec(50), ymd(2024, 3, 6), at_noon(ymd(2024, 3, 6))).await;

        let summaries =
            aggregate_category_spend(&db, user.id, &march_2024(), SortKey::AmountSpent)
                .await
                .unwrap();

        assert_eq!(summaries[0].category_id, first.id);
        assert_eq!(summaries[1].category_id, second.id);
    }
}
