//! Category repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::entities::{Category, category};

/// Repository for category operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get category by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))
    }

    /// Find category by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<category::Model>> {
        Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get category by slug, returning error if not found.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<category::Model> {
        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {slug}")))
    }

    /// List all categories in display order.
    pub async fn find_all(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by(category::Column::Order, Order::Asc)
            .order_by(category::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all categories.
    pub async fn count(&self) -> AppResult<u64> {
        Category::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a category.
    pub async fn update(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a category. Contained forums, topics and posts are removed
    /// by the storage-layer cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
