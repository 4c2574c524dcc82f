//! User service: registration, sign-in, token auth, and profiles.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{post, topic, user, user_profile},
    repositories::{PostRepository, TopicRepository, UserProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many recent topics and posts a profile page shows.
const PROFILE_RECENT_LIMIT: u64 = 10;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    topic_repo: TopicRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for signing in.
#[derive(Debug, Deserialize)]
pub struct SigninInput {
    pub username: String,
    pub password: String,
}

/// Input for editing the caller's own profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 512))]
    pub avatar_url: Option<Option<String>>,

    #[validate(length(max = 2048))]
    pub bio: Option<Option<String>>,

    #[validate(length(max = 128))]
    pub location: Option<Option<String>>,

    #[validate(length(max = 512))]
    pub website: Option<Option<String>>,

    #[validate(length(max = 1024))]
    pub signature: Option<Option<String>>,
}

/// A user's public profile with recent activity.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: user::Model,
    pub profile: user_profile::Model,
    pub recent_topics: Vec<topic::Model>,
    pub recent_posts: Vec<post::Model>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        topic_repo: TopicRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            topic_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user. Creates the user row and its profile row in
    /// one transaction, exactly one of each, and issues an access token.
    pub async fn signup(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::ConstraintViolation(
                "Username already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            token: Set(Some(token)),
            ..Default::default()
        };

        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            ..Default::default()
        };

        let (user, _profile) = self
            .user_repo
            .create_with_profile(user_model, profile_model)
            .await?;

        Ok(user)
    }

    /// Authenticate with username and password. Issues a fresh token so
    /// the returned model always carries a usable credential.
    pub async fn signin(&self, input: SigninInput) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = profile.password.ok_or(AppError::Unauthorized)?;
        if !verify_password(&input.password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let new_token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token));

        self.user_repo.update(active).await
    }

    /// Invalidate the user's current token.
    pub async fn signout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.token = Set(None);

        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Public profile for a username: user, profile, and recent activity.
    pub async fn profile(&self, username: &str) -> AppResult<ProfileView> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {username}")))?;

        let profile = self.profile_repo.get_by_user_id(&user.id).await?;
        let recent_topics = self
            .topic_repo
            .find_recent_by_author(&user.id, PROFILE_RECENT_LIMIT)
            .await?;
        let recent_posts = self
            .post_repo
            .find_recent_by_author(&user.id, PROFILE_RECENT_LIMIT)
            .await?;

        Ok(ProfileView {
            user,
            profile,
            recent_topics,
            recent_posts,
        })
    }

    /// Edit the caller's own profile fields.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user_profile::Model> {
        input.validate()?;

        self.profile_repo
            .update_fields(
                user_id,
                input.avatar_url,
                input.bio,
                input.location,
                input.website,
                input.signature,
            )
            .await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            token: Some("test_token".to_string()),
            is_admin: false,
            created_at: Utc::now().into(),
        }
    }

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        profile_db: Arc<sea_orm::DatabaseConnection>,
    ) -> UserService {
        UserService::new(
            UserRepository::new(user_db),
            UserProfileRepository::new(profile_db),
            TopicRepository::new(empty_conn()),
            PostRepository::new(empty_conn()),
        )
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(verify_password("test_password_123", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1).unwrap());
        assert!(verify_password("same_password", &hash2).unwrap());
    }

    fn create_test_profile(user_id: &str) -> user_profile::Model {
        user_profile::Model {
            user_id: user_id.to_string(),
            password: Some("hash".to_string()),
            avatar_url: None,
            bio: None,
            location: None,
            website: None,
            signature: None,
            post_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_signup_creates_user_and_profile_together() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Username lookup finds nothing, then the transactional
                // pair of inserts returns both rows.
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[create_test_user("u1", "alice")]])
                .append_query_results([[create_test_profile("u1")]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_conn());

        let created = service
            .signup(CreateUserInput {
                username: "alice".to_string(),
                password: "long enough pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.username, "alice");
        assert!(created.token.is_some());
    }

    #[tokio::test]
    async fn test_signup_rejects_taken_username() {
        let existing = create_test_user("u1", "Alice");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_conn());

        let result = service
            .signup(CreateUserInput {
                username: "alice".to_string(),
                password: "long enough pw".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let service = create_test_service(empty_conn(), empty_conn());

        let result = service
            .signup(CreateUserInput {
                username: "alice".to_string(),
                password: "short".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signin_unknown_user() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_conn());

        let result = service
            .signin(SigninInput {
                username: "nobody".to_string(),
                password: "whatever1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let user = create_test_user("u1", "alice");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_conn());

        let result = service.authenticate_by_token("test_token").await.unwrap();
        assert_eq!(result.id, "u1");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_missing() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_conn());

        let result = service.authenticate_by_token("bogus").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
