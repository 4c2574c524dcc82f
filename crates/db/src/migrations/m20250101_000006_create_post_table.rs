//! Create post table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Post::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Post::TopicId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::Content).text().not_null())
                    .col(ColumnDef::new(Post::IsEdited).boolean().not_null().default(false))
                    .col(ColumnDef::new(Post::EditedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (topic_id, created_at, id) for reading order
        manager
            .create_index(
                Index::create()
                    .name("idx_post_topic_reading_order")
                    .table(Post::Table)
                    .col(Post::TopicId)
                    .col(Post::CreatedAt)
                    .col(Post::Id)
                    .to_owned(),
            )
            .await?;

        // Index: author_id (profile pages, post_count recomputation)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_author_id")
                    .table(Post::Table)
                    .col(Post::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Foreign key: topic_id -> topic.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_post_topic_id")
                    .from(Post::Table, Post::TopicId)
                    .to(Topic::Table, Topic::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Foreign key: author_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_post_author_id")
                    .from(Post::Table, Post::AuthorId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    TopicId,
    AuthorId,
    Content,
    IsEdited,
    EditedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Topic {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
