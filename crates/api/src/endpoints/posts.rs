//! Post mutation endpoints.

use axum::{extract::State, routing::post, Json, Router};
use agora_common::AppResult;
use agora_db::entities::post;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Post update request.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub post_id: String,
    pub content: String,
}

/// Edit a post. Author or admin only.
async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<ApiResponse<post::Model>> {
    let input = agora_core::post::UpdatePostInput {
        post_id: req.post_id,
        content: req.content,
    };

    let updated = state.post_service.update(&user, input).await?;

    Ok(ApiResponse::ok(updated))
}

/// Post delete request.
#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    pub post_id: String,
}

/// Delete response.
#[derive(Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
}

/// Delete a post. The first post of a topic is refused.
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeletePostRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.post_service.delete(&user, &req.post_id).await?;

    Ok(ApiResponse::ok(DeletedResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update", post(update_post))
        .route("/delete", post(delete_post))
}
