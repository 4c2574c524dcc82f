//! Post entity - one message within a topic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning topic.
    #[sea_orm(indexed)]
    pub topic_id: String,

    /// Author user ID.
    #[sea_orm(indexed)]
    pub author_id: String,

    /// Post body (markdown).
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Set once the post has been edited in place.
    #[sea_orm(default_value = false)]
    pub is_edited: bool,

    /// Timestamp of the last edit.
    #[sea_orm(nullable)]
    pub edited_at: Option<DateTimeWithTimeZone>,

    /// Canonical reading order is (created_at, id) ascending.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topic::Entity",
        from = "Column::TopicId",
        to = "super::topic::Column::Id",
        on_delete = "Cascade"
    )]
    Topic,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::topic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
