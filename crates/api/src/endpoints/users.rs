//! User profile endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use agora_common::AppResult;
use agora_db::entities::{post, topic, user, user_profile};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public view of a user. Never exposes the token.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Public view of a profile. Never exposes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFields {
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub signature: Option<String>,
    pub post_count: i64,
}

impl From<user_profile::Model> for ProfileFields {
    fn from(profile: user_profile::Model) -> Self {
        Self {
            avatar_url: profile.avatar_url,
            bio: profile.bio,
            location: profile.location,
            website: profile.website,
            signature: profile.signature,
            post_count: profile.post_count,
        }
    }
}

/// Profile page response: user, profile fields, recent activity.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: UserView,
    pub profile: ProfileFields,
    pub recent_topics: Vec<topic::Model>,
    pub recent_posts: Vec<post::Model>,
}

/// A user's public profile.
async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let view = state.user_service.profile(&username).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        user: view.user.into(),
        profile: view.profile.into(),
        recent_topics: view.recent_topics,
        recent_posts: view.recent_posts,
    }))
}

/// Deserialize so that an explicit `null` becomes `Some(None)` (clear
/// the field) while an absent key stays `None` (leave it untouched).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Profile update request. `null` clears a field; an absent field is
/// left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub signature: Option<Option<String>>,
}

/// Edit the caller's own profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileFields>> {
    let input = agora_core::user::UpdateProfileInput {
        avatar_url: req.avatar_url,
        bio: req.bio,
        location: req.location,
        website: req.website,
        signature: req.signature,
    };

    let updated = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(updated.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(profile))
        .route("/profile/update", post(update_profile))
}
