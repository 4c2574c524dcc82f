//! Authorization decisions.
//!
//! Pure functions over loaded rows. Each returns `Ok(())` when the action
//! is allowed and the specific refusal error otherwise, so callers can
//! surface the precise reason to the client.

use agora_common::{AppError, AppResult};
use agora_db::entities::{forum, post, topic, user};

/// Whether a user may open a new topic in a forum.
///
/// A locked forum refuses new topics from everyone, admins included;
/// unlocking it is the way to post there again.
pub fn can_create_topic(_actor: &user::Model, forum: &forum::Model) -> AppResult<()> {
    if forum.is_locked {
        return Err(AppError::ForumLocked);
    }
    Ok(())
}

/// Whether a user may reply to a topic.
///
/// Both the containing forum and the topic itself must be unlocked.
/// The forum lock is reported first when both are set.
pub fn can_reply(
    _actor: &user::Model,
    forum: &forum::Model,
    topic: &topic::Model,
) -> AppResult<()> {
    if forum.is_locked {
        return Err(AppError::ForumLocked);
    }
    if topic.is_locked {
        return Err(AppError::TopicLocked);
    }
    Ok(())
}

/// Whether a user may edit a post.
///
/// Ownership only: the author or an admin. Topic and forum locks do not
/// apply to editing existing posts.
pub fn can_edit_post(actor: &user::Model, post: &post::Model) -> AppResult<()> {
    if actor.is_admin || post.author_id == actor.id {
        return Ok(());
    }
    Err(AppError::NotOwner)
}

/// Whether a user may delete a post.
///
/// The first post of a topic is never deletable on its own, not even by
/// an admin; deleting the topic is the way to remove it. Otherwise the
/// same ownership rules as editing apply.
pub fn can_delete_post(
    actor: &user::Model,
    post: &post::Model,
    first_post_id: &str,
) -> AppResult<()> {
    if post.id == first_post_id {
        return Err(AppError::CannotDeleteFirstPost);
    }
    if actor.is_admin || post.author_id == actor.id {
        return Ok(());
    }
    Err(AppError::NotOwner)
}

/// Whether a user may perform moderation actions (pin, lock, manage
/// categories and forums).
pub fn can_moderate(actor: &user::Model) -> AppResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AppError::NotOwner)
    }
}
