use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A single recorded expense.
///
/// The `date` column is a calendar date, not a timestamp: the user records
/// *which day* money was spent, and month windows are computed against that
/// day. `created_at` carries the full insertion timestamp and drives the
/// recent-activity sort order.
///
/// A soft-deleted transaction is terminal: once `deleted_at` is set the row
/// must not be mutated again.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user that owns this transaction.
    pub user_id: i32,
    /// The category this expense is booked against. Must reference a
    /// non-deleted category of the same user; the write path enforces this.
    pub category_id: i32,
    /// Optional payment source.
    pub source_id: Option<i32>,
    /// Amount spent. Always positive; this is an expense tracker, not a
    /// double-entry ledger.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    /// Free-text label for what the money was spent on.
    pub spent_on: String,
    /// Calendar day of the expense.
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    /// Soft-delete marker. A non-null value excludes the row from all reads.
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::source::Entity",
        from = "Column::SourceId",
        to = "super::source::Column::Id",
        on_delete = "SetNull"
    )]
    Source,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this transaction has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
