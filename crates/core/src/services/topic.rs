//! Topic service: creation with seed post, topic detail pages, and
//! moderation flags.

use agora_common::{derive_slug, AppError, AppResult, Config, IdGenerator};
use agora_db::{
    entities::{category, forum, post, topic, user},
    repositories::{
        CategoryRepository, ForumRepository, PostRepository, TopicRepository,
        UserProfileRepository,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::{counters, policy};

/// Topic service for business logic.
#[derive(Clone)]
pub struct TopicService {
    category_repo: CategoryRepository,
    forum_repo: ForumRepository,
    topic_repo: TopicRepository,
    post_repo: PostRepository,
    profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
    posts_per_page: u64,
}

/// Input for opening a new topic. The content becomes the seed post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopicInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 65536))]
    pub content: String,
}

/// Input for toggling a topic's moderation flags. Admin-only.
#[derive(Debug, Deserialize)]
pub struct TopicFlagsInput {
    pub is_pinned: Option<bool>,
    pub is_announced: Option<bool>,
    pub is_locked: Option<bool>,
}

/// A topic with its computed reply count, as shown in forum listings.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub topic: topic::Model,
    pub post_count: u64,
}

/// One page of a topic's posts, with the resolved ancestors.
#[derive(Debug, Clone, Serialize)]
pub struct TopicPage {
    pub category: category::Model,
    pub forum: forum::Model,
    pub topic: topic::Model,
    pub posts: Vec<post::Model>,
    pub page: u64,
    pub page_count: u64,
    pub post_count: u64,
}

impl TopicService {
    /// Create a new topic service.
    #[must_use]
    pub fn new(
        category_repo: CategoryRepository,
        forum_repo: ForumRepository,
        topic_repo: TopicRepository,
        post_repo: PostRepository,
        profile_repo: UserProfileRepository,
        config: &Config,
    ) -> Self {
        Self {
            category_repo,
            forum_repo,
            topic_repo,
            post_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
            posts_per_page: config.forum.posts_per_page,
        }
    }

    /// Open a new topic in a forum. The topic and its seed post are
    /// written in one transaction, then the author's post count is
    /// recomputed.
    pub async fn create(
        &self,
        actor: &user::Model,
        category_slug: &str,
        forum_slug: &str,
        input: CreateTopicInput,
    ) -> AppResult<(topic::Model, post::Model)> {
        input.validate()?;

        let category = self.category_repo.get_by_slug(category_slug).await?;
        let forum = self
            .forum_repo
            .get_by_slug(&category.id, forum_slug)
            .await?;

        policy::can_create_topic(actor, &forum)?;

        // Topic slugs carry no uniqueness; the id segment of the URL is
        // what resolves, so an empty slug from an all-punctuation title
        // is harmless.
        let slug = derive_slug(&input.title);

        let now = Utc::now();
        let topic_id = self.id_gen.generate();

        let topic_model = topic::ActiveModel {
            id: Set(topic_id.clone()),
            forum_id: Set(forum.id),
            title: Set(input.title),
            slug: Set(slug),
            author_id: Set(actor.id.clone()),
            is_pinned: Set(false),
            is_announced: Set(false),
            is_locked: Set(false),
            views: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let post_model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            topic_id: Set(topic_id),
            author_id: Set(actor.id.clone()),
            content: Set(input.content),
            is_edited: Set(false),
            edited_at: Set(None),
            created_at: Set(now.into()),
        };

        let (topic, post) = self
            .topic_repo
            .create_with_first_post(topic_model, post_model)
            .await?;

        counters::recompute_post_count(&self.post_repo, &self.profile_repo, &actor.id).await?;

        Ok((topic, post))
    }

    /// Resolve a topic URL down to its rows. The id segment is
    /// authoritative; a stale or forged slug (or a forum that does not
    /// contain the topic) is `NotFound`, never a redirect.
    pub async fn resolve(
        &self,
        category_slug: &str,
        forum_slug: &str,
        topic_slug: &str,
        topic_id: &str,
    ) -> AppResult<(category::Model, forum::Model, topic::Model)> {
        let category = self.category_repo.get_by_slug(category_slug).await?;
        let forum = self
            .forum_repo
            .get_by_slug(&category.id, forum_slug)
            .await?;
        let topic = self.topic_repo.get_by_id(topic_id).await?;

        if topic.forum_id != forum.id || topic.slug != topic_slug {
            return Err(AppError::NotFound(format!("Topic not found: {topic_id}")));
        }

        Ok((category, forum, topic))
    }

    /// Topic detail: one page of posts in reading order. Bumps the view
    /// counter as a side effect; that write is best-effort and a failure
    /// never fails the read.
    pub async fn detail(
        &self,
        category_slug: &str,
        forum_slug: &str,
        topic_slug: &str,
        topic_id: &str,
        page: u64,
    ) -> AppResult<TopicPage> {
        if page == 0 {
            return Err(AppError::BadRequest("Pages are numbered from 1".to_string()));
        }

        let (category, forum, topic) = self
            .resolve(category_slug, forum_slug, topic_slug, topic_id)
            .await?;

        let post_count = self.post_repo.count_by_topic(&topic.id).await?;
        let page_count = post_count.div_ceil(self.posts_per_page).max(1);
        if page > page_count {
            return Err(AppError::NotFound(format!("No such page: {page}")));
        }

        // Counted only once the read is known to succeed.
        if let Err(e) = self.topic_repo.increment_views(&topic.id).await {
            warn!(topic_id = %topic.id, error = %e, "View count bump failed");
        }

        let offset = (page - 1) * self.posts_per_page;
        let posts = self
            .post_repo
            .find_page_by_topic(&topic.id, self.posts_per_page, offset)
            .await?;

        Ok(TopicPage {
            category,
            forum,
            topic,
            posts,
            page,
            page_count,
            post_count,
        })
    }

    /// Toggle pin/announce/lock flags. Admin-only; checked by the
    /// caller. Flag changes do not bump `updated_at`, so they do not
    /// reshuffle the activity ordering.
    pub async fn set_flags(&self, id: &str, input: TopicFlagsInput) -> AppResult<topic::Model> {
        let topic = self.topic_repo.get_by_id(id).await?;
        let mut active: topic::ActiveModel = topic.into();

        if let Some(is_pinned) = input.is_pinned {
            active.is_pinned = Set(is_pinned);
        }
        if let Some(is_announced) = input.is_announced {
            active.is_announced = Set(is_announced);
        }
        if let Some(is_locked) = input.is_locked {
            active.is_locked = Set(is_locked);
        }

        self.topic_repo.update(active).await
    }

    /// Delete a topic and its posts, then recompute the post counts of
    /// every author who had posts in it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.topic_repo.get_by_id(id).await?;

        let author_ids = self.post_repo.find_author_ids_by_topic(id).await?;

        self.topic_repo.delete(id).await?;

        for author_id in author_ids {
            counters::recompute_post_count(&self.post_repo, &self.profile_repo, &author_id)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_common::config::{DatabaseConfig, ForumConfig, ServerConfig};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_config() -> Config {
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

    fn make_category(id: &str, slug: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            icon: None,
            color: None,
            order: 0,
            created_at: Utc::now().into(),
        }
    }

    fn make_forum(id: &str, category_id: &str, slug: &str, locked: bool) -> forum::Model {
        forum::Model {
            id: id.to_string(),
            category_id: category_id.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            icon: None,
            order: 0,
            is_locked: locked,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn make_topic(id: &str, forum_id: &str, slug: &str) -> topic::Model {
        topic::Model {
            id: id.to_string(),
            forum_id: forum_id.to_string(),
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

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service_with(
        category_db: Arc<sea_orm::DatabaseConnection>,
        forum_db: Arc<sea_orm::DatabaseConnection>,
        topic_db: Arc<sea_orm::DatabaseConnection>,
    ) -> TopicService {
        TopicService::new(
            CategoryRepository::new(category_db),
            ForumRepository::new(forum_db),
            TopicRepository::new(topic_db),
            PostRepository::new(empty_conn()),
            UserProfileRepository::new(empty_conn()),
            &test_config(),
        )
    }

    #[tokio::test]
    async fn test_create_refused_in_locked_forum() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_category("c1", "general")]])
                .into_connection(),
        );
        let forum_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_forum("f1", "c1", "chat", true)]])
                .into_connection(),
        );

        let service = service_with(category_db, forum_db, empty_conn());
        let alice = make_user("alice", false);

        let result = service
            .create(
                &alice,
                "general",
                "chat",
                CreateTopicInput {
                    title: "Hello".to_string(),
                    content: "First!".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ForumLocked)));
    }

    #[tokio::test]
    async fn test_create_validates_empty_title() {
        let service = service_with(empty_conn(), empty_conn(), empty_conn());
        let alice = make_user("alice", false);

        let result = service
            .create(
                &alice,
                "general",
                "chat",
                CreateTopicInput {
                    title: String::new(),
                    content: "body".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_slug_mismatch() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_category("c1", "general")]])
                .into_connection(),
        );
        let forum_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_forum("f1", "c1", "chat", false)]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_topic("t1", "f1", "hello-world")]])
                .into_connection(),
        );

        let service = service_with(category_db, forum_db, topic_db);

        let result = service.resolve("general", "chat", "forged-slug", "t1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_wrong_forum() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_category("c1", "general")]])
                .into_connection(),
        );
        let forum_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_forum("f2", "c1", "other", false)]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_topic("t1", "f1", "hello")]])
                .into_connection(),
        );

        let service = service_with(category_db, forum_db, topic_db);

        let result = service.resolve("general", "other", "hello", "t1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_accepts_matching_reference() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_category("c1", "general")]])
                .into_connection(),
        );
        let forum_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_forum("f1", "c1", "chat", false)]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_topic("t1", "f1", "hello-world")]])
                .into_connection(),
        );

        let service = service_with(category_db, forum_db, topic_db);

        let (_, forum, topic) = service
            .resolve("general", "chat", "hello-world", "t1")
            .await
            .unwrap();

        assert_eq!(forum.id, "f1");
        assert_eq!(topic.id, "t1");
    }

    #[tokio::test]
    async fn test_detail_page_past_end_does_not_bump_views() {
        let category_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_category("c1", "general")]])
                .into_connection(),
        );
        let forum_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_forum("f1", "c1", "chat", false)]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_topic("t1", "f1", "hello")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let service = TopicService::new(
            CategoryRepository::new(category_db),
            ForumRepository::new(forum_db),
            TopicRepository::new(Arc::clone(&topic_db)),
            PostRepository::new(post_db),
            UserProfileRepository::new(empty_conn()),
            &test_config(),
        );

        let result = service.detail("general", "chat", "hello", "t1", 5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // The failed read must not have issued a view-count update.
        drop(service);
        let log = Arc::try_unwrap(topic_db).unwrap().into_transaction_log();
        assert!(!format!("{log:?}").contains("UPDATE"));
    }
}
