//! Database entities.

pub mod category;
pub mod forum;
pub mod post;
pub mod topic;
pub mod user;
pub mod user_profile;

pub use category::Entity as Category;
pub use forum::Entity as Forum;
pub use post::Entity as Post;
pub use topic::Entity as Topic;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
