//! Forum entity - a lockable container of topics under one category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forum")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning category.
    #[sea_orm(indexed)]
    pub category_id: String,

    /// Forum name.
    pub name: String,

    /// URL slug, unique within the category.
    #[sea_orm(indexed)]
    pub slug: String,

    /// Forum description.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Emoji or icon class.
    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// Display order (lower first).
    #[sea_orm(default_value = 0)]
    pub order: i32,

    /// When locked, no new topics may be created.
    #[sea_orm(default_value = false)]
    pub is_locked: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,

    #[sea_orm(has_many = "super::topic::Entity")]
    Topics,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::topic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
