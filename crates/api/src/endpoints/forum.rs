//! Forum browsing endpoints: board index, category and forum listings,
//! topic pages, and the authenticated topic/reply mutations.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use agora_common::{AppError, AppResult};
use agora_core::{BoardStats, CategoryWithForums, ForumPage, TopicPage};
use agora_db::entities::{post, topic};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::users::UserView, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// 1-based page selector; absent means page 1.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// The canonical URL segment for a topic: `{slug}-{id}`.
///
/// Ids are ULIDs and contain no `-`, so splitting on the last `-`
/// recovers the id unambiguously even when the slug itself has dashes
/// or is empty.
fn topic_ref(topic: &topic::Model) -> String {
    format!("{}-{}", topic.slug, topic.id)
}

/// Split a topic ref into (slug, id). The id is authoritative; the slug
/// is checked against the stored one downstream.
fn parse_topic_ref(reference: &str) -> AppResult<(&str, &str)> {
    reference
        .rsplit_once('-')
        .ok_or_else(|| AppError::NotFound(format!("Topic not found: {reference}")))
}

/// Board stats with the newest member reduced to public fields.
#[derive(Serialize)]
pub struct BoardStatsResponse {
    pub topic_count: u64,
    pub post_count: u64,
    pub user_count: u64,
    pub latest_user: Option<UserView>,
}

impl From<BoardStats> for BoardStatsResponse {
    fn from(stats: BoardStats) -> Self {
        Self {
            topic_count: stats.topic_count,
            post_count: stats.post_count,
            user_count: stats.user_count,
            latest_user: stats.latest_user.map(UserView::from),
        }
    }
}

/// Board index response.
#[derive(Serialize)]
pub struct BoardResponse {
    pub categories: Vec<CategoryWithForums>,
    pub stats: BoardStatsResponse,
}

/// The board index: categories with forums and board-wide totals.
async fn board_index(State(state): State<AppState>) -> AppResult<ApiResponse<BoardResponse>> {
    let board = state.forum_service.board_index().await?;

    Ok(ApiResponse::ok(BoardResponse {
        categories: board.categories,
        stats: board.stats.into(),
    }))
}

/// One category with its forums and counts.
async fn category_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<CategoryWithForums>> {
    let detail = state.forum_service.category_detail(&slug).await?;
    Ok(ApiResponse::ok(detail))
}

/// One page of a forum's topic listing.
async fn forum_page(
    State(state): State<AppState>,
    Path((category_slug, forum_slug)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ForumPage>> {
    let page = state
        .forum_service
        .forum_page(&category_slug, &forum_slug, query.page.unwrap_or(1))
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Topic creation request. The content becomes the seed post.
#[derive(Debug, Deserialize)]
pub struct CreateTopicRequest {
    pub title: String,
    pub content: String,
}

/// Topic creation response.
#[derive(Serialize)]
pub struct TopicCreatedResponse {
    pub topic: topic::Model,
    pub first_post: post::Model,
    /// URL segment for the new topic.
    pub topic_ref: String,
}

/// Open a new topic in a forum.
async fn create_topic(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((category_slug, forum_slug)): Path<(String, String)>,
    Json(req): Json<CreateTopicRequest>,
) -> AppResult<ApiResponse<TopicCreatedResponse>> {
    let input = agora_core::topic::CreateTopicInput {
        title: req.title,
        content: req.content,
    };

    let (topic, first_post) = state
        .topic_service
        .create(&user, &category_slug, &forum_slug, input)
        .await?;

    let reference = topic_ref(&topic);

    Ok(ApiResponse::ok(TopicCreatedResponse {
        topic,
        first_post,
        topic_ref: reference,
    }))
}

/// Topic detail: one page of posts. Bumps the view counter.
async fn topic_detail(
    State(state): State<AppState>,
    Path((category_slug, forum_slug, reference)): Path<(String, String, String)>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<TopicPage>> {
    let (topic_slug, topic_id) = parse_topic_ref(&reference)?;

    let page = state
        .topic_service
        .detail(
            &category_slug,
            &forum_slug,
            topic_slug,
            topic_id,
            query.page.unwrap_or(1),
        )
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Reply request.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// Reply to a topic.
async fn reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((category_slug, forum_slug, reference)): Path<(String, String, String)>,
    Json(req): Json<ReplyRequest>,
) -> AppResult<ApiResponse<post::Model>> {
    let (topic_slug, topic_id) = parse_topic_ref(&reference)?;

    let (_, forum, topic) = state
        .topic_service
        .resolve(&category_slug, &forum_slug, topic_slug, topic_id)
        .await?;

    let created = state
        .post_service
        .reply(
            &user,
            &forum,
            &topic,
            agora_core::post::CreatePostInput {
                content: req.content,
            },
        )
        .await?;

    Ok(ApiResponse::ok(created))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(board_index))
        .route("/categories/{slug}", get(category_detail))
        .route("/{category_slug}/{forum_slug}", get(forum_page))
        .route("/{category_slug}/{forum_slug}/topics", post(create_topic))
        .route("/{category_slug}/{forum_slug}/{topic_ref}", get(topic_detail))
        .route(
            "/{category_slug}/{forum_slug}/{topic_ref}/reply",
            post(reply),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_topic(slug: &str, id: &str) -> topic::Model {
        topic::Model {
            id: id.to_string(),
            forum_id: "f1".to_string(),
            title: slug.to_string(),
            slug: slug.to_string(),
            author_id: "alice".to_string(),
            is_pinned: false,
            is_announced: false,
            is_locked: false,
            views: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_topic_ref_round_trips() {
        let topic = make_topic("hello-world", "01hq3k4abcdefghjkmnpqrstvw");
        let reference = topic_ref(&topic);

        let (slug, id) = parse_topic_ref(&reference).unwrap();
        assert_eq!(slug, "hello-world");
        assert_eq!(id, "01hq3k4abcdefghjkmnpqrstvw");
    }

    #[test]
    fn test_topic_ref_with_empty_slug() {
        let topic = make_topic("", "01hq3k4abcdefghjkmnpqrstvw");
        let reference = topic_ref(&topic);

        let (slug, id) = parse_topic_ref(&reference).unwrap();
        assert_eq!(slug, "");
        assert_eq!(id, "01hq3k4abcdefghjkmnpqrstvw");
    }

    #[test]
    fn test_parse_topic_ref_without_separator() {
        let result = parse_topic_ref("justoneword");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
