//! User entity.
//!
//! The minimal identity surface the auth subsystem supplies: an opaque
//! id plus the elevated-privilege flag. Credential material lives in
//! `user_profile`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Access token for bearer authentication.
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Elevated (staff) privilege: bypasses ownership checks and may
    /// mutate categories, forums and topic flags.
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::topic::Entity")]
    Topics,

    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_one = "super::user_profile::Entity")]
    Profile,
}

impl Related<super::topic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topics.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
