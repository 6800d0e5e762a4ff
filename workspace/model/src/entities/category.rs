use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

/// A user-defined spending bucket with a monthly budget target.
///
/// Category names are unique per user among *non-deleted* rows; the write
/// path enforces this before inserting or renaming. Deleted categories keep
/// their row (soft delete) so historical transactions still resolve.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user that owns this category.
    pub user_id: i32,
    pub name: String,
    /// Display glyph shown by clients, opaque to the backend.
    pub icon: String,
    /// Monthly budget target for this category.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub budget: Decimal,
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
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this category has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity {
    /// All non-deleted categories owned by `user_id`, in creation order.
    pub async fn find_active_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Looks up a non-deleted category by name within a user's scope.
    /// Used by the write path to enforce per-user name uniqueness.
    pub async fn find_active_by_name(
        db: &DatabaseConnection,
        user_id: i32,
        name: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .filter(Column::Name.eq(name))
            .one(db)
            .await
    }
}
