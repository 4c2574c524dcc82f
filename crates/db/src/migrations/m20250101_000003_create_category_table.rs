//! Create category table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Name).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(Category::Slug).string_len(100).not_null())
                    .col(ColumnDef::new(Category::Description).text())
                    .col(ColumnDef::new(Category::Icon).string_len(50))
                    .col(ColumnDef::new(Category::Color).string_len(7))
                    .col(ColumnDef::new(Category::Order).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Category::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: slug (category slugs are globally unique)
        manager
            .create_index(
                Index::create()
                    .name("idx_category_slug")
                    .table(Category::Table)
                    .col(Category::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Icon,
    Color,
    Order,
    CreatedAt,
}
