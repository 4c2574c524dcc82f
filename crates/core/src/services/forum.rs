//! Forum service: board index, forum listing pages, and forum
//! administration.

use agora_common::{derive_slug, AppError, AppResult, Config, IdGenerator};
use agora_db::{
    entities::{category, forum, user},
    repositories::{
        CategoryRepository, ForumRepository, PostRepository, TopicRepository, UserRepository,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::topic::TopicSummary;

/// Forum service for business logic.
#[derive(Clone)]
pub struct ForumService {
    category_repo: CategoryRepository,
    forum_repo: ForumRepository,
    topic_repo: TopicRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    topics_per_page: u64,
}

/// Input for creating a forum.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateForumInput {
    pub category_id: String,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Slug override; derived from the name when absent.
    #[validate(length(min = 1, max = 128))]
    pub slug: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    #[validate(length(max = 128))]
    pub icon: Option<String>,

    pub order: Option<i32>,
}

/// Input for updating a forum. No slug field: slugs stay stable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateForumInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<Option<String>>,

    #[validate(length(max = 128))]
    pub icon: Option<Option<String>>,

    pub order: Option<i32>,
    pub is_locked: Option<bool>,
}

/// A forum with its computed listing counts.
#[derive(Debug, Clone, Serialize)]
pub struct ForumSummary {
    pub forum: forum::Model,
    pub topic_count: u64,
    pub post_count: u64,
}

/// A category with its forums and their counts.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithForums {
    pub category: category::Model,
    pub forums: Vec<ForumSummary>,
}

/// Board-wide totals, computed on read.
#[derive(Debug, Clone, Serialize)]
pub struct BoardStats {
    pub topic_count: u64,
    pub post_count: u64,
    pub user_count: u64,
    pub latest_user: Option<user::Model>,
}

/// The board index: every category with its forums, plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub categories: Vec<CategoryWithForums>,
    pub stats: BoardStats,
}

/// One page of a forum's topic listing.
#[derive(Debug, Clone, Serialize)]
pub struct ForumPage {
    pub category: category::Model,
    pub forum: forum::Model,
    pub topics: Vec<TopicSummary>,
    pub page: u64,
    pub page_count: u64,
    pub topic_count: u64,
}

impl ForumService {
    /// Create a new forum service.
    #[must_use]
    pub fn new(
        category_repo: CategoryRepository,
        forum_repo: ForumRepository,
        topic_repo: TopicRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
        config: &Config,
    ) -> Self {
        Self {
            category_repo,
            forum_repo,
            topic_repo,
            post_repo,
            user_repo,
            id_gen: IdGenerator::new(),
            topics_per_page: config.forum.topics_per_page,
        }
    }

    /// The board index: all categories with their forums and counts,
    /// plus board-wide totals and the newest member.
    pub async fn board_index(&self) -> AppResult<BoardView> {
        let categories = self.category_repo.find_all().await?;

        let mut out = Vec::with_capacity(categories.len());
        for cat in categories {
            let forums = self.forum_repo.find_by_category(&cat.id).await?;
            let mut summaries = Vec::with_capacity(forums.len());
            for f in forums {
                summaries.push(self.summarize(f).await?);
            }
            out.push(CategoryWithForums {
                category: cat,
                forums: summaries,
            });
        }

        let stats = BoardStats {
            topic_count: self.topic_repo.count().await?,
            post_count: self.post_repo.count().await?,
            user_count: self.user_repo.count().await?,
            latest_user: self.user_repo.find_latest().await?,
        };

        Ok(BoardView {
            categories: out,
            stats,
        })
    }

    /// A single category with its forums and counts.
    pub async fn category_detail(&self, slug: &str) -> AppResult<CategoryWithForums> {
        let category = self.category_repo.get_by_slug(slug).await?;

        let forums = self.forum_repo.find_by_category(&category.id).await?;
        let mut summaries = Vec::with_capacity(forums.len());
        for f in forums {
            summaries.push(self.summarize(f).await?);
        }

        Ok(CategoryWithForums {
            category,
            forums: summaries,
        })
    }

    /// One page of a forum's topic listing, topics in default order.
    /// Pages are 1-based; a page past the end is `NotFound`.
    pub async fn forum_page(
        &self,
        category_slug: &str,
        forum_slug: &str,
        page: u64,
    ) -> AppResult<ForumPage> {
        if page == 0 {
            return Err(AppError::BadRequest("Pages are numbered from 1".to_string()));
        }

        let category = self.category_repo.get_by_slug(category_slug).await?;
        let forum = self
            .forum_repo
            .get_by_slug(&category.id, forum_slug)
            .await?;

        let topic_count = self.topic_repo.count_by_forum(&forum.id).await?;
        let page_count = topic_count.div_ceil(self.topics_per_page).max(1);
        if page > page_count {
            return Err(AppError::NotFound(format!("No such page: {page}")));
        }

        let offset = (page - 1) * self.topics_per_page;
        let topics = self
            .topic_repo
            .find_page_by_forum(&forum.id, self.topics_per_page, offset)
            .await?;

        let mut summaries = Vec::with_capacity(topics.len());
        for t in topics {
            let post_count = self.post_repo.count_by_topic(&t.id).await?;
            summaries.push(TopicSummary {
                topic: t,
                post_count,
            });
        }

        Ok(ForumPage {
            category,
            forum,
            topics: summaries,
            page,
            page_count,
            topic_count,
        })
    }

    /// Create a forum in a category. Admin-only; checked by the caller.
    pub async fn create(&self, input: CreateForumInput) -> AppResult<forum::Model> {
        input.validate()?;

        // Parent must exist before anything is written.
        let category = self.category_repo.get_by_id(&input.category_id).await?;

        let slug = match input.slug {
            Some(slug) => slug,
            None => derive_slug(&input.name),
        };
        if slug.is_empty() {
            return Err(AppError::BadRequest(
                "Forum name yields an empty slug".to_string(),
            ));
        }

        // Forum slugs are unique within their category.
        if self
            .forum_repo
            .find_by_slug(&category.id, &slug)
            .await?
            .is_some()
        {
            return Err(AppError::ConstraintViolation(format!(
                "Forum slug already in use in this category: {slug}"
            )));
        }

        let model = forum::ActiveModel {
            id: Set(self.id_gen.generate()),
            category_id: Set(category.id),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            icon: Set(input.icon),
            order: Set(input.order.unwrap_or(0)),
            is_locked: Set(false),
            ..Default::default()
        };

        self.forum_repo.create(model).await
    }

    /// Update a forum. Renames do not regenerate the slug.
    pub async fn update(&self, id: &str, input: UpdateForumInput) -> AppResult<forum::Model> {
        input.validate()?;

        let existing = self.forum_repo.get_by_id(id).await?;
        let mut active: forum::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(icon);
        }
        if let Some(order) = input.order {
            active.order = Set(order);
        }
        if let Some(is_locked) = input.is_locked {
            active.is_locked = Set(is_locked);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.forum_repo.update(active).await
    }

    /// Lock or unlock a forum.
    pub async fn set_locked(&self, id: &str, locked: bool) -> AppResult<forum::Model> {
        self.forum_repo.set_locked(id, locked).await
    }

    /// Delete a forum and everything under it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.forum_repo.get_by_id(id).await?;
        self.forum_repo.delete(id).await
    }

    async fn summarize(&self, forum: forum::Model) -> AppResult<ForumSummary> {
        let topic_count = self.topic_repo.count_by_forum(&forum.id).await?;
        let post_count = self.post_repo.count_by_forum(&forum.id).await?;
        Ok(ForumSummary {
            forum,
            topic_count,
            post_count,
        })
    }
}
