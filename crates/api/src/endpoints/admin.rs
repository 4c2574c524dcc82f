//! Admin endpoints: category/forum management and topic moderation.
//!
//! Every handler gates on the admin flag before touching a service.

use axum::{extract::State, routing::post, Json, Router};
use agora_common::AppResult;
use agora_core::policy;
use agora_db::entities::{category, forum, topic};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
}

/// Create a category.
async fn create_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<agora_core::category::CreateCategoryInput>,
) -> AppResult<ApiResponse<category::Model>> {
    policy::can_moderate(&user)?;

    let created = state.category_service.create(input).await?;
    Ok(ApiResponse::ok(created))
}

/// Category update request.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: agora_core::category::UpdateCategoryInput,
}

/// Update a category.
async fn update_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<category::Model>> {
    policy::can_moderate(&user)?;

    let updated = state.category_service.update(&req.id, req.fields).await?;
    Ok(ApiResponse::ok(updated))
}

/// Delete-by-id request, shared by the delete endpoints.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

/// Delete a category and everything under it.
async fn delete_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    policy::can_moderate(&user)?;

    state.category_service.delete(&req.id).await?;
    Ok(ApiResponse::ok(DeletedResponse { ok: true }))
}

/// Create a forum.
async fn create_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<agora_core::forum::CreateForumInput>,
) -> AppResult<ApiResponse<forum::Model>> {
    policy::can_moderate(&user)?;

    let created = state.forum_service.create(input).await?;
    Ok(ApiResponse::ok(created))
}

/// Forum update request.
#[derive(Debug, Deserialize)]
pub struct UpdateForumRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: agora_core::forum::UpdateForumInput,
}

/// Update a forum, including its lock flag.
async fn update_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateForumRequest>,
) -> AppResult<ApiResponse<forum::Model>> {
    policy::can_moderate(&user)?;

    let updated = state.forum_service.update(&req.id, req.fields).await?;
    Ok(ApiResponse::ok(updated))
}

/// Forum lock request.
#[derive(Debug, Deserialize)]
pub struct ForumLockRequest {
    pub id: String,
    pub is_locked: bool,
}

/// Lock or unlock a forum.
async fn lock_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ForumLockRequest>,
) -> AppResult<ApiResponse<forum::Model>> {
    policy::can_moderate(&user)?;

    let updated = state.forum_service.set_locked(&req.id, req.is_locked).await?;
    Ok(ApiResponse::ok(updated))
}

/// Delete a forum and everything under it.
async fn delete_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    policy::can_moderate(&user)?;

    state.forum_service.delete(&req.id).await?;
    Ok(ApiResponse::ok(DeletedResponse { ok: true }))
}

/// Topic flags request.
#[derive(Debug, Deserialize)]
pub struct TopicFlagsRequest {
    pub id: String,
    #[serde(flatten)]
    pub flags: agora_core::topic::TopicFlagsInput,
}

/// Toggle a topic's pin/announce/lock flags.
async fn set_topic_flags(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<TopicFlagsRequest>,
) -> AppResult<ApiResponse<topic::Model>> {
    policy::can_moderate(&user)?;

    let updated = state.topic_service.set_flags(&req.id, req.flags).await?;
    Ok(ApiResponse::ok(updated))
}

/// Delete a topic and its posts.
async fn delete_topic(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    policy::can_moderate(&user)?;

    state.topic_service.delete(&req.id).await?;
    Ok(ApiResponse::ok(DeletedResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories/create", post(create_category))
        .route("/categories/update", post(update_category))
        .route("/categories/delete", post(delete_category))
        .route("/forums/create", post(create_forum))
        .route("/forums/update", post(update_forum))
        .route("/forums/lock", post(lock_forum))
        .route("/forums/delete", post(delete_forum))
        .route("/topics/flags", post(set_topic_flags))
        .route("/topics/delete", post(delete_topic))
}
