//! API integration tests.
//!
//! Build the router over mock databases and drive it with real HTTP
//! requests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use agora_api::{middleware::AppState, router as api_router};
use agora_common::config::{Config, DatabaseConfig, ForumConfig, ServerConfig};
use agora_core::{CategoryService, ForumService, PostService, TopicService, UserService};
use agora_db::repositories::{
    CategoryRepository, ForumRepository, PostRepository, TopicRepository, UserProfileRepository,
    UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "http://localhost:3000".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        forum: ForumConfig::default(),
    }
}

/// A mock connection that answers every query with an empty result set.
fn empty_db() -> Arc<DatabaseConnection> {
    Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<agora_db::entities::category::Model>::new()])
            .append_query_results([Vec::<agora_db::entities::category::Model>::new()])
            .into_connection(),
    )
}

fn create_test_state() -> AppState {
    let config = create_test_config();
    let db = empty_db();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let forum_repo = ForumRepository::new(Arc::clone(&db));
    let topic_repo = TopicRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(
            user_repo.clone(),
            profile_repo.clone(),
            topic_repo.clone(),
            post_repo.clone(),
        ),
        category_service: CategoryService::new(category_repo.clone()),
        forum_service: ForumService::new(
            category_repo.clone(),
            forum_repo.clone(),
            topic_repo.clone(),
            post_repo.clone(),
            user_repo,
            &config,
        ),
        topic_service: TopicService::new(
            category_repo,
            forum_repo,
            topic_repo.clone(),
            post_repo.clone(),
            profile_repo.clone(),
            &config,
        ),
        post_service: PostService::new(topic_repo, post_repo, profile_repo),
    }
}

fn create_test_app() -> Router {
    api_router().with_state(create_test_state())
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_category_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/forum/categories/no-such-category")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_update_requires_auth() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts/update")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"post_id":"p1","content":"new"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_topic_creation_requires_auth() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/forum/general/chat/topics")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"Hi","content":"First"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_error() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_admin_surface_requires_auth() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/topics/flags")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"id":"t1","is_locked":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
