//! Category entity - top-level grouping of forums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Category name.
    #[sea_orm(unique)]
    pub name: String,

    /// URL slug, derived from the name at creation. Globally unique.
    #[sea_orm(unique, indexed)]
    pub slug: String,

    /// Category description.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Emoji or icon class.
    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// Hex color code.
    #[sea_orm(nullable)]
    pub color: Option<String>,

    /// Display order (lower first).
    #[sea_orm(default_value = 0)]
    pub order: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::forum::Entity")]
    Forums,
}

impl Related<super::forum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forums.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
