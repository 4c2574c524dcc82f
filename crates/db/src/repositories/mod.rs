//! Database repositories.

mod category;
mod forum;
mod post;
mod topic;
mod user;
mod user_profile;

pub use category::CategoryRepository;
pub use forum::ForumRepository;
pub use post::PostRepository;
pub use topic::TopicRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
