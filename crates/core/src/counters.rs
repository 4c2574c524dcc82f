//! Denormalized counter maintenance.
//!
//! The only stored counter that survives writes is
//! `user_profile.post_count`, and it is always overwritten with a fresh
//! `COUNT(*)` rather than adjusted by a delta, so it can never drift.
//! Listing aggregates are computed on read and never stored.

use agora_common::AppResult;
use agora_db::repositories::{PostRepository, UserProfileRepository};
use tracing::debug;

/// Recompute a user's post count from the posts table and overwrite the
/// stored value. Called after every post create or delete, including the
/// seed post written with a new topic and the cascade of a topic delete.
pub async fn recompute_post_count(
    post_repo: &PostRepository,
    profile_repo: &UserProfileRepository,
    user_id: &str,
) -> AppResult<u64> {
    let count = post_repo.count_by_author(user_id).await?;
    profile_repo.set_post_count(user_id, count).await?;

    debug!(user_id = %user_id, count, "Recomputed post count");
    Ok(count)
}
