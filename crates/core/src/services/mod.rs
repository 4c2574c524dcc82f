//! Business logic services.

#![allow(missing_docs)]

pub mod category;
pub mod forum;
pub mod post;
pub mod topic;
pub mod user;

pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use forum::{
    BoardStats, BoardView, CategoryWithForums, CreateForumInput, ForumPage, ForumService,
    ForumSummary, UpdateForumInput,
};
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use topic::{
    CreateTopicInput, TopicFlagsInput, TopicPage, TopicService, TopicSummary,
};
pub use user::{
    CreateUserInput, ProfileView, SigninInput, UpdateProfileInput, UserService,
};
