//! Topic entity - a discussion thread within a forum.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "topic")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning forum.
    #[sea_orm(indexed)]
    pub forum_id: String,

    /// Topic title.
    pub title: String,

    /// URL slug derived from the title. Not unique; the id segment of
    /// the identity path disambiguates topics sharing a slug.
    #[sea_orm(indexed)]
    pub slug: String,

    /// Author user ID.
    #[sea_orm(indexed)]
    pub author_id: String,

    /// Pinned topics sort before everything else.
    #[sea_orm(default_value = false)]
    pub is_pinned: bool,

    /// Announced topics sort after pinned, before the rest.
    #[sea_orm(default_value = false)]
    pub is_announced: bool,

    /// When locked, no new posts may be created.
    #[sea_orm(default_value = false)]
    pub is_locked: bool,

    /// Best-effort view counter; lost updates under race are accepted.
    #[sea_orm(default_value = 0)]
    pub views: i64,

    pub created_at: DateTimeWithTimeZone,

    /// Bumped whenever a post is added; drives default topic ordering.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forum::Entity",
        from = "Column::ForumId",
        to = "super::forum::Column::Id",
        on_delete = "Cascade"
    )]
    Forum,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,

    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::forum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forum.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
