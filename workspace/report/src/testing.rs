//! Shared fixtures for the reporting engine's tests: an in-memory database
//! with the real migrations applied, plus seeding helpers for users,
//! categories and transactions.

use chrono::{NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use model::entities::{category, transaction, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn dec(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

pub fn at_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed user")
}

pub async fn seed_category(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
    budget: Decimal,
    created_at: NaiveDateTime,
) -> category::Model {
    category::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        icon: Set("🛒".to_string()),
        budget: Set(budget),
        created_at: Set(created_at),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed category")
}

pub async fn seed_transaction(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: i32,
    amount: Decimal,
    date: NaiveDate,
    created_at: NaiveDateTime,
) -> transaction::Model {
    transaction::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        source_id: Set(None),
        amount: Set(amount),
        spent_on: Set("test expense".to_string()),
        date: Set(date),
        created_at: Set(created_at),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed transaction")
}

pub async fn soft_delete_category(db: &DatabaseConnection, model: category::Model) {
    let deleted_at = at_noon(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    let mut active: category::ActiveModel = model.into();
    active.deleted_at = Set(Some(deleted_at));
    active.update(db).await.expect("Failed to soft-delete category");
}

pub async fn soft_delete_transaction(db: &DatabaseConnection, model: transaction::Model) {
    let deleted_at = at_noon(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    let mut active: transaction::ActiveModel = model.into();
    active.deleted_at = Set(Some(deleted_at));
    active
        .update(db)
        .await
        .expect("Failed to soft-delete transaction");
}
