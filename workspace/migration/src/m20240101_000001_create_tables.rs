use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Users
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Username).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // 2. Categories
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::UserId).integer().not_null())
                    .col(ColumnDef::new(Category::Name).string().not_null())
                    .col(ColumnDef::new(Category::Icon).string().not_null())
                    .col(
                        ColumnDef::new(Category::Budget)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Category::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Category::DeletedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-category-user")
                            .from(Category::Table, Category::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Sources
        manager
            .create_table(
                Table::create()
                    .table(Source::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Source::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Source::UserId).integer().not_null())
                    .col(ColumnDef::new(Source::Label).string().not_null())
                    .col(ColumnDef::new(Source::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Source::DeletedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-source-user")
                            .from(Source::Table, Source::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Transactions
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transaction::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transaction::UserId).integer().not_null())
                    .col(ColumnDef::new(Transaction::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Transaction::SourceId).integer())
                    .col(
                        ColumnDef::new(Transaction::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transaction::SpentOn).string().not_null())
                    .col(ColumnDef::new(Transaction::Date).date().not_null())
                    .col(ColumnDef::new(Transaction::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Transaction::DeletedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction-user")
                            .from(Transaction::Table, Transaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction-category")
                            .from(Transaction::Table, Transaction::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction-source")
                            .from(Transaction::Table, Transaction::SourceId)
                            .to(Source::Table, Source::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Aggregations always filter by owner and window, so index those paths.
        manager
            .create_index(
                Index::create()
                    .name("idx-transaction-user-date")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .col(Transaction::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-category-user")
                    .table(Category::Table)
                    .col(Category::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Source::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    UserId,
    Name,
    Icon,
    Budget,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Source {
    #[sea_orm(iden = "sources")]
    Table,
    Id,
    UserId,
    Label,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Transaction {
    #[sea_orm(iden = "transactions")]
    Table,
    Id,
    UserId,
    CategoryId,
    SourceId,
    Amount,
    SpentOn,
    Date,
    CreatedAt,
    DeletedAt,
}
