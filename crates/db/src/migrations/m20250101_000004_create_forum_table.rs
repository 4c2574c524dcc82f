//! Create forum table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forum::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Forum::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Forum::CategoryId).string_len(32).not_null())
                    .col(ColumnDef::new(Forum::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Forum::Slug).string_len(150).not_null())
                    .col(ColumnDef::new(Forum::Description).text())
                    .col(ColumnDef::new(Forum::Icon).string_len(50))
                    .col(ColumnDef::new(Forum::Order).integer().not_null().default(0))
                    .col(ColumnDef::new(Forum::IsLocked).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Forum::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Forum::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: (category_id, slug) - forum slugs unique per category
        manager
            .create_index(
                Index::create()
                    .name("idx_forum_category_id_slug")
                    .table(Forum::Table)
                    .col(Forum::CategoryId)
                    .col(Forum::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Foreign key: category_id -> category.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_forum_category_id")
                    .from(Forum::Table, Forum::CategoryId)
                    .to(Category::Table, Category::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Forum::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Forum {
    Table,
    Id,
    CategoryId,
    Name,
    Slug,
    Description,
    Icon,
    Order,
    IsLocked,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
