//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use agora_core::{CategoryService, ForumService, PostService, TopicService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub forum_service: ForumService,
    pub topic_service: TopicService,
    pub post_service: PostService,
}

/// Authentication middleware. Resolves a bearer token to a user and
/// stashes it in request extensions; anonymous requests pass through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
            && let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Ok(user) = state.user_service.authenticate_by_token(token).await {
                    req.extensions_mut().insert(user);
                }
            }

    next.run(req).await
}
