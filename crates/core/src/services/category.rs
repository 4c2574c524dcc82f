//! Category service.

use agora_common::{derive_slug, AppError, AppResult, IdGenerator};
use agora_db::{entities::category, repositories::CategoryRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Category service for business logic.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Slug override; derived from the name when absent.
    #[validate(length(min = 1, max = 128))]
    pub slug: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    #[validate(length(max = 128))]
    pub icon: Option<String>,

    #[validate(length(max = 32))]
    pub color: Option<String>,

    pub order: Option<i32>,
}

/// Input for updating a category. The slug is deliberately absent:
/// slugs are computed once at creation and stay stable across renames.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<Option<String>>,

    #[validate(length(max = 128))]
    pub icon: Option<Option<String>>,

    #[validate(length(max = 32))]
    pub color: Option<Option<String>>,

    pub order: Option<i32>,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a category. Admin-only; checked by the caller.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let slug = match input.slug {
            Some(slug) => slug,
            None => derive_slug(&input.name),
        };
        if slug.is_empty() {
            return Err(AppError::BadRequest(
                "Category name yields an empty slug".to_string(),
            ));
        }

        // Category slugs are globally unique.
        if self.category_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::ConstraintViolation(format!(
                "Category slug already in use: {slug}"
            )));
        }

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            icon: Set(input.icon),
            color: Set(input.color),
            order: Set(input.order.unwrap_or(0)),
            ..Default::default()
        };

        self.category_repo.create(model).await
    }

    /// Update a category. Renames do not regenerate the slug.
    pub async fn update(&self, id: &str, input: UpdateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let existing = self.category_repo.get_by_id(id).await?;
        let mut active: category::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(icon);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(order) = input.order {
            active.order = Set(order);
        }

        self.category_repo.update(active).await
    }

    /// Delete a category. Contained forums, topics and posts go with it
    /// via the storage-layer cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // 404 before delete so a missing id is reported as such.
        self.category_repo.get_by_id(id).await?;
        self.category_repo.delete(id).await
    }
}
