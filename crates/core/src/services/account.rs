//! Account service: registration, sign-in and access tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::{author, user, user_profile},
    repositories::{AuthorRepository, UserProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Account kind picked at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Reader,
    Author,
}

/// Where the client should go after authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// New authors register their first work.
    RegisterWork,
    Home,
}

/// Input for creating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(
        length(min = 1, max = 150),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[serde(default)]
    pub role: Role,
}

/// Input for signing in.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SigninInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// An authenticated user with the token to present on later requests.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
    pub is_author: bool,
    pub next: NextStep,
}

/// Usernames that collide with static `/profile/*` routes.
const RESERVED_USERNAMES: &[&str] = &["edit"];

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
    if !username.chars().all(allowed) {
        return Err(ValidationError::new("username_charset"));
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|reserved| username.eq_ignore_ascii_case(reserved))
    {
        return Err(ValidationError::new("username_reserved"));
    }
    Ok(())
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    author_repo: AuthorRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, author_repo: AuthorRepository) -> Self {
        Self {
            user_repo,
            author_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a user, its profile and, for authors, its author record.
    pub async fn register(&self, input: RegisterInput) -> AppResult<Session> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let now = Utc::now();

        let is_author = input.role == Role::Author;

        // User, profile and author land together or not at all
        let txn = self.user_repo.begin().await?;

        let user = UserRepository::create_in(
            &txn,
            user::ActiveModel {
                id: Set(user_id.clone()),
                username: Set(input.username.clone()),
                username_lower: Set(input.username.to_lowercase()),
                password_hash: Set(password_hash),
                token: Set(Some(token.clone())),
                created_at: Set(now.into()),
                updated_at: Set(None),
            },
        )
        .await
        .map_err(|e| match e {
            // Lost a race against a concurrent signup
            AppError::Conflict(_) => AppError::Conflict("Username already taken".to_string()),
            other => other,
        })?;

        UserProfileRepository::create_in(
            &txn,
            user_profile::ActiveModel {
                user_id: Set(user_id.clone()),
                bio: Set(String::new()),
                profile_image: Set(None),
                cover_image: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(None),
            },
        )
        .await?;

        if is_author {
            AuthorRepository::create_in(
                &txn,
                author::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.clone()),
                    bio: Set(String::new()),
                    created_at: Set(now.into()),
                },
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = ?input.role, "Registered account");

        Ok(Session {
            user,
            token,
            is_author,
            next: if is_author {
                NextStep::RegisterWork
            } else {
                NextStep::Home
            },
        })
    }

    /// Check credentials and hand back the current token.
    pub async fn signin(&self, input: SigninInput) -> AppResult<Session> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        // Rows seeded outside registration may carry no token yet
        let (user, token) = match user.token.clone() {
            Some(token) => (user, token),
            None => self.rotate_token(user).await?,
        };

        let is_author = self.author_repo.find_by_user_id(&user.id).await?.is_some();

        tracing::debug!(user_id = %user.id, "Signed in");

        Ok(Session {
            user,
            token,
            is_author,
            next: NextStep::Home,
        })
    }

    /// Invalidate the caller's token.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.rotate_token(user).await?;

        tracing::debug!(user_id = %user_id, "Logged out");
        Ok(())
    }

    /// Resolve an access token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    async fn rotate_token(&self, user: user::Model) -> AppResult<(user::Model, String)> {
        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        Ok((user, token))
    }
}

/// Hash a password with Argon2 and a fresh salt.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
