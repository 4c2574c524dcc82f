//! Post repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{Post, post, topic};

/// Repository for post operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get post by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))
    }

    /// List a page of posts in a topic, in canonical reading order:
    /// oldest first, ULID id as the tiebreaker for equal timestamps.
    pub async fn find_page_by_topic(
        &self,
        topic_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::TopicId.eq(topic_id))
            .order_by(post::Column::CreatedAt, Order::Asc)
            .order_by(post::Column::Id, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the first post of a topic (minimum creation order).
    pub async fn find_first_of_topic(&self, topic_id: &str) -> AppResult<Option<post::Model>> {
        Post::find()
            .filter(post::Column::TopicId.eq(topic_id))
            .order_by(post::Column::CreatedAt, Order::Asc)
            .order_by(post::Column::Id, Order::Asc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts in a topic.
    pub async fn count_by_topic(&self, topic_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::TopicId.eq(topic_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts across all topics of a forum.
    pub async fn count_by_forum(&self, forum_id: &str) -> AppResult<u64> {
        Post::find()
            .join(JoinType::InnerJoin, post::Relation::Topic.def())
            .filter(topic::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts authored by a user. This is the source of truth the
    /// denormalized `user_profile.post_count` is recomputed from.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct author IDs of a topic's posts. Used to know whose post
    /// counts need recomputing before the topic row (and its posts) go
    /// away in a cascade.
    pub async fn find_author_ids_by_topic(&self, topic_id: &str) -> AppResult<Vec<String>> {
        Post::find()
            .select_only()
            .column(post::Column::AuthorId)
            .distinct()
            .filter(post::Column::TopicId.eq(topic_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all posts.
    pub async fn count(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find recent posts authored by a user.
    pub async fn find_recent_by_author(
        &self,
        author_id: &str,
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by(post::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
