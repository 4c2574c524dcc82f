//! User profile entity (forum-facing profile fields and counters).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    /// Same as user.id (1:1 relationship).
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Password hash (Argon2).
    #[sea_orm(nullable)]
    pub password: Option<String>,

    /// Avatar URL.
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Short biography.
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Location.
    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Website URL.
    #[sea_orm(nullable)]
    pub website: Option<String>,

    /// Signature appended under the user's posts.
    #[sea_orm(nullable)]
    pub signature: Option<String>,

    /// Denormalized count of the user's posts. A cache of a derivable
    /// aggregate: recomputed from source after every post create or
    /// delete, never incrementally adjusted.
    #[sea_orm(default_value = 0)]
    pub post_count: i64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
