//! Create user profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfile::Password).string_len(256))
                    .col(ColumnDef::new(UserProfile::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(UserProfile::Bio).text())
                    .col(ColumnDef::new(UserProfile::Location).string_len(100))
                    .col(ColumnDef::new(UserProfile::Website).string_len(1024))
                    .col(ColumnDef::new(UserProfile::Signature).string_len(250))
                    .col(
                        ColumnDef::new(UserProfile::PostCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserProfile::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Foreign key: user_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_user_profile_user_id")
                    .from(UserProfile::Table, UserProfile::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserProfile {
    Table,
    UserId,
    Password,
    AvatarUrl,
    Bio,
    Location,
    Website,
    Signature,
    PostCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
