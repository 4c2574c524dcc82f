//! Agora server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use agora_api::{middleware::AppState, router as api_router};
use agora_common::Config;
use agora_core::{CategoryService, ForumService, PostService, TopicService, UserService};
use agora_db::repositories::{
    CategoryRepository, ForumRepository, PostRepository, TopicRepository, UserProfileRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting agora server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = agora_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    agora_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let forum_repo = ForumRepository::new(Arc::clone(&db));
    let topic_repo = TopicRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(
        user_repo.clone(),
        profile_repo.clone(),
        topic_repo.clone(),
        post_repo.clone(),
    );
    let category_service = CategoryService::new(category_repo.clone());
    let forum_service = ForumService::new(
        category_repo.clone(),
        forum_repo.clone(),
        topic_repo.clone(),
        post_repo.clone(),
        user_repo,
        &config,
    );
    let topic_service = TopicService::new(
        category_repo,
        forum_repo,
        topic_repo.clone(),
        post_repo.clone(),
        profile_repo.clone(),
        &config,
    );
    let post_service = PostService::new(topic_repo, post_repo, profile_repo);

    let state = AppState {
        user_service,
        category_service,
        forum_service,
        topic_service,
        post_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            agora_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
