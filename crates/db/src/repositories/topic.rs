//! Topic repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::entities::{Topic, post, topic};

/// Repository for topic operations.
#[derive(Clone)]
pub struct TopicRepository {
    db: Arc<DatabaseConnection>,
}

impl TopicRepository {
    /// Create a new topic repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find topic by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<topic::Model>> {
        Topic::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get topic by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<topic::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic not found: {id}")))
    }

    /// List a page of topics in a forum, in default order: pinned first,
    /// then announced, then most recently updated.
    pub async fn find_page_by_forum(
        &self,
        forum_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<topic::Model>> {
        Topic::find()
            .filter(topic::Column::ForumId.eq(forum_id))
            .order_by(topic::Column::IsPinned, Order::Desc)
            .order_by(topic::Column::IsAnnounced, Order::Desc)
            .order_by(topic::Column::UpdatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count topics in a forum.
    pub async fn count_by_forum(&self, forum_id: &str) -> AppResult<u64> {
        Topic::find()
            .filter(topic::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all topics.
    pub async fn count(&self) -> AppResult<u64> {
        Topic::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find recent topics authored by a user.
    pub async fn find_recent_by_author(
        &self,
        author_id: &str,
        limit: u64,
    ) -> AppResult<Vec<topic::Model>> {
        Topic::find()
            .filter(topic::Column::AuthorId.eq(author_id))
            .order_by(topic::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a topic together with its seed post in one transaction.
    ///
    /// A topic must never exist without at least one post; either both
    /// rows are written or neither is.
    pub async fn create_with_first_post(
        &self,
        topic_model: topic::ActiveModel,
        post_model: post::ActiveModel,
    ) -> AppResult<(topic::Model, post::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let topic = topic_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let post = post_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((topic, post))
    }

    /// Update a topic.
    pub async fn update(&self, model: topic::ActiveModel) -> AppResult<topic::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bump the updated timestamp (called when a post is added).
    pub async fn touch_updated_at(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        Topic::update_many()
            .col_expr(topic::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(topic::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment the view counter. Best-effort: not transactional, and a
    /// racing increment may be lost without being considered a defect.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        Topic::update_many()
            .col_expr(
                topic::Column::Views,
                Expr::col(topic::Column::Views).add(1),
            )
            .filter(topic::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Delete a topic. Contained posts are removed by the storage-layer
    /// cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Topic::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
