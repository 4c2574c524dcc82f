//! Forum repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{Forum, forum};

/// Repository for forum operations.
#[derive(Clone)]
pub struct ForumRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumRepository {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find forum by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<forum::Model>> {
        Forum::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get forum by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<forum::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Forum not found: {id}")))
    }

    /// Find forum by slug within a category.
    pub async fn find_by_slug(
        &self,
        category_id: &str,
        slug: &str,
    ) -> AppResult<Option<forum::Model>> {
        Forum::find()
            .filter(forum::Column::CategoryId.eq(category_id))
            .filter(forum::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get forum by slug within a category, returning error if not found.
    pub async fn get_by_slug(&self, category_id: &str, slug: &str) -> AppResult<forum::Model> {
        self.find_by_slug(category_id, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Forum not found: {slug}")))
    }

    /// List forums of a category in display order.
    pub async fn find_by_category(&self, category_id: &str) -> AppResult<Vec<forum::Model>> {
        Forum::find()
            .filter(forum::Column::CategoryId.eq(category_id))
            .order_by(forum::Column::Order, Order::Asc)
            .order_by(forum::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new forum.
    pub async fn create(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a forum.
    pub async fn update(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set the locked flag.
    pub async fn set_locked(&self, id: &str, locked: bool) -> AppResult<forum::Model> {
        let forum = self.get_by_id(id).await?;
        let mut active: forum::ActiveModel = forum.into();
        active.is_locked = Set(locked);
        active.updated_at = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a forum. Contained topics and posts are removed by the
    /// storage-layer cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Forum::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_forum(id: &str, category_id: &str, name: &str, slug: &str) -> forum::Model {
        forum::Model {
            id: id.to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            icon: Some("💬".to_string()),
            order: 0,
            is_locked: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let forum = create_test_forum("f1", "cat1", "General", "general");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[forum.clone()]])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.find_by_slug("cat1", "general").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "General");
    }

    #[tokio::test]
    async fn test_find_by_category() {
        let f1 = create_test_forum("f1", "cat1", "General", "general");
        let f2 = create_test_forum("f2", "cat1", "Help", "help");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.find_by_category("cat1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_set_locked() {
        let forum = create_test_forum("f1", "cat1", "General", "general");
        let mut locked = forum.clone();
        locked.is_locked = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[forum]])
                .append_query_results([[locked]])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.set_locked("f1", true).await.unwrap();

        assert!(result.is_locked);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.delete("f1").await;

        assert!(result.is_ok());
    }
}
