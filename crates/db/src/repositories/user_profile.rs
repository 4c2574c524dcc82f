//! User profile repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::{UserProfile, user_profile};

/// Repository for user profile operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find profile by user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get profile by user ID, returning error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile not found for user: {user_id}")))
    }

    /// Overwrite the denormalized post count with a freshly computed
    /// value. Always a full overwrite, never a delta.
    pub async fn set_post_count(&self, user_id: &str, count: u64) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        let count = i64::try_from(count).unwrap_or(i64::MAX);

        UserProfile::update_many()
            .col_expr(user_profile::Column::PostCount, Expr::value(count))
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Update profile fields in place.
    pub async fn update_fields(
        &self,
        user_id: &str,
        avatar_url: Option<Option<String>>,
        bio: Option<Option<String>>,
        location: Option<Option<String>>,
        website: Option<Option<String>>,
        signature: Option<Option<String>>,
    ) -> AppResult<user_profile::Model> {
        let profile = self.get_by_user_id(user_id).await?;
        let mut active: user_profile::ActiveModel = profile.into();

        if let Some(avatar_url) = avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        if let Some(bio) = bio {
            active.bio = Set(bio);
        }
        if let Some(location) = location {
            active.location = Set(location);
        }
        if let Some(website) = website {
            active.website = Set(website);
        }
        if let Some(signature) = signature {
            active.signature = Set(signature);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
