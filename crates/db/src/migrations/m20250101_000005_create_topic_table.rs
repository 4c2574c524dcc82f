//! Create topic table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Topic::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Topic::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Topic::ForumId).string_len(32).not_null())
                    .col(ColumnDef::new(Topic::Title).string_len(250).not_null())
                    .col(ColumnDef::new(Topic::Slug).string_len(250).not_null())
                    .col(ColumnDef::new(Topic::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Topic::IsPinned).boolean().not_null().default(false))
                    .col(ColumnDef::new(Topic::IsAnnounced).boolean().not_null().default(false))
                    .col(ColumnDef::new(Topic::IsLocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Topic::Views).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Topic::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Topic::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (forum_id, is_pinned, is_announced, updated_at)
        // for the default topic listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_forum_listing")
                    .table(Topic::Table)
                    .col(Topic::ForumId)
                    .col(Topic::IsPinned)
                    .col(Topic::IsAnnounced)
                    .col(Topic::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: author_id (profile pages)
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_author_id")
                    .table(Topic::Table)
                    .col(Topic::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Foreign key: forum_id -> forum.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_topic_forum_id")
                    .from(Topic::Table, Topic::ForumId)
                    .to(Forum::Table, Forum::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Foreign key: author_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_topic_author_id")
                    .from(Topic::Table, Topic::AuthorId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Topic::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Topic {
    Table,
    Id,
    ForumId,
    Title,
    Slug,
    AuthorId,
    IsPinned,
    IsAnnounced,
    IsLocked,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Forum {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
