//! Post service: replies, edits, and deletion.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{forum, post, topic, user},
    repositories::{PostRepository, TopicRepository, UserProfileRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::{counters, policy};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    topic_repo: TopicRepository,
    post_repo: PostRepository,
    profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
}

/// Input for replying to a topic.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 65536))]
    pub content: String,
}

/// Input for editing a post.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    pub post_id: String,

    #[validate(length(min = 1, max = 65536))]
    pub content: String,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        topic_repo: TopicRepository,
        post_repo: PostRepository,
        profile_repo: UserProfileRepository,
    ) -> Self {
        Self {
            topic_repo,
            post_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Reply to an already-resolved topic. Bumps the topic's activity
    /// timestamp and recomputes the author's post count.
    pub async fn reply(
        &self,
        actor: &user::Model,
        forum: &forum::Model,
        topic: &topic::Model,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        policy::can_reply(actor, forum, topic)?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            topic_id: Set(topic.id.clone()),
            author_id: Set(actor.id.clone()),
            content: Set(input.content),
            is_edited: Set(false),
            edited_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        let created = self.post_repo.create(model).await?;

        self.topic_repo.touch_updated_at(&topic.id).await?;
        counters::recompute_post_count(&self.post_repo, &self.profile_repo, &actor.id).await?;

        Ok(created)
    }

    /// Edit a post's content. Author or admin only; marks the post as
    /// edited with a timestamp.
    pub async fn update(&self, actor: &user::Model, input: UpdatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(&input.post_id).await?;

        policy::can_edit_post(actor, &post)?;

        let mut active: post::ActiveModel = post.into();
        active.content = Set(input.content);
        active.is_edited = Set(true);
        active.edited_at = Set(Some(Utc::now().into()));

        self.post_repo.update(active).await
    }

    /// Delete a post. The first post of a topic is refused; removing it
    /// means deleting the topic. Recomputes the author's post count
    /// afterwards.
    pub async fn delete(&self, actor: &user::Model, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let first = self
            .post_repo
            .find_first_of_topic(&post.topic_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Topic has no posts: {}", post.topic_id)))?;

        policy::can_delete_post(actor, &post, &first.id)?;

        let author_id = post.author_id.clone();
        self.post_repo.delete(&post.id).await?;

        counters::recompute_post_count(&self.post_repo, &self.profile_repo, &author_id).await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn make_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_lowercase(),
            token: None,
            is_admin,
            created_at: Utc::now().into(),
        }
    }

    fn make_forum(locked: bool) -> forum::Model {
        forum::Model {
            id: "f1".to_string(),
            category_id: "c1".to_string(),
            name: "Chat".to_string(),
            slug: "chat".to_string(),
            description: None,
            icon: None,
            order: 0,
            is_locked: locked,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn make_topic(locked: bool) -> topic::Model {
        topic::Model {
            id: "t1".to_string(),
            forum_id: "f1".to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            author_id: "alice".to_string(),
            is_pinned: false,
            is_announced: false,
            is_locked: locked,
            views: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn make_post(id: &str, author_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            topic_id: "t1".to_string(),
            author_id: author_id.to_string(),
            content: "hi".to_string(),
            is_edited: false,
            edited_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service_with(
        topic_db: Arc<sea_orm::DatabaseConnection>,
        post_db: Arc<sea_orm::DatabaseConnection>,
    ) -> PostService {
        PostService::new(
            TopicRepository::new(topic_db),
            PostRepository::new(post_db),
            UserProfileRepository::new(empty_conn()),
        )
    }

    #[tokio::test]
    async fn test_reply_refused_in_locked_topic() {
        let service = service_with(empty_conn(), empty_conn());
        let alice = make_user("alice", false);

        let result = service
            .reply(
                &alice,
                &make_forum(false),
                &make_topic(true),
                CreatePostInput {
                    content: "me too".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::TopicLocked)));
    }

    #[tokio::test]
    async fn test_reply_validates_empty_content() {
        let service = service_with(empty_conn(), empty_conn());
        let alice = make_user("alice", false);

        let result = service
            .reply(
                &alice,
                &make_forum(false),
                &make_topic(false),
                CreatePostInput {
                    content: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_refused() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_post("p2", "alice")]])
                .into_connection(),
        );

        let service = service_with(empty_conn(), post_db);
        let bob = make_user("bob", false);

        let result = service
            .update(
                &bob,
                UpdatePostInput {
                    post_id: "p2".to_string(),
                    content: "hijacked".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotOwner)));
    }

    #[tokio::test]
    async fn test_author_may_edit_in_locked_topic() {
        let edited = post::Model {
            content: "corrected".to_string(),
            is_edited: true,
            edited_at: Some(Utc::now().into()),
            ..make_post("p2", "alice")
        };
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Target lookup, then the row written back.
                .append_query_results([[make_post("p2", "alice")]])
                .append_query_results([[edited]])
                .into_connection(),
        );

        let service = service_with(empty_conn(), post_db);
        let alice = make_user("alice", false);

        let result = service
            .update(
                &alice,
                UpdatePostInput {
                    post_id: "p2".to_string(),
                    content: "corrected".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(result.is_edited);
        assert_eq!(result.content, "corrected");
    }

    #[tokio::test]
    async fn test_delete_first_post_is_refused() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Target lookup, then first-post lookup.
                .append_query_results([[make_post("p1", "alice")]])
                .append_query_results([[make_post("p1", "alice")]])
                .into_connection(),
        );

        let service = service_with(empty_conn(), post_db);
        let admin = make_user("root", true);

        let result = service.delete(&admin, "p1").await;
        assert!(matches!(result, Err(AppError::CannotDeleteFirstPost)));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(empty_conn(), post_db);
        let alice = make_user("alice", false);

        let result = service.delete(&alice, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
