//! Authentication endpoints.

use axum::{extract::State, routing::post, Json, Router};
use agora_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Signup request.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Signup response.
#[derive(Serialize)]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let input = agora_core::user::CreateUserInput {
        username: req.username,
        password: req.password,
    };

    let user = state.user_service.signup(input).await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Signin request.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Signin response.
#[derive(Serialize)]
pub struct SigninResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in to an existing account. Issues a fresh token.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let user = state
        .user_service
        .signin(agora_core::user::SigninInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(SigninResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Signout response.
#[derive(Serialize)]
pub struct SignoutResponse {
    pub ok: bool,
}

/// Sign out, invalidating the current token.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SignoutResponse>> {
    state.user_service.signout(&user.id).await?;

    Ok(ApiResponse::ok(SignoutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
