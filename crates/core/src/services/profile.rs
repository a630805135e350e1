//! Profile service.

use chrono::Utc;
use fandoom_common::{AppError, AppResult};
use fandoom_db::{
    entities::{author, user, user_profile, work},
    repositories::{
        AuthorRepository, FollowRepository, UserProfileRepository, UserRepository, WorkRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::post::{PostService, PostView};

/// Input for editing the caller's profile. Absent fields are left alone;
/// an empty image URL clears the image.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileInput {
    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(length(max = 1024))]
    pub profile_image: Option<String>,

    #[validate(length(max = 1024))]
    pub cover_image: Option<String>,
}

/// A user's public page.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: user::Model,
    pub profile: user_profile::Model,
    pub author: Option<author::Model>,
    pub works: Vec<work::Model>,
    pub followers_count: u64,
    pub following_count: u64,
    pub is_following: bool,
    pub posts: Vec<PostView>,
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    author_repo: AuthorRepository,
    work_repo: WorkRepository,
    follow_repo: FollowRepository,
    post_service: PostService,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        author_repo: AuthorRepository,
        work_repo: WorkRepository,
        follow_repo: FollowRepository,
        post_service: PostService,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            author_repo,
            work_repo,
            follow_repo,
            post_service,
        }
    }

    /// Load a user's public page by username.
    pub async fn get(
        &self,
        username: &str,
        limit: u64,
        until_id: Option<&str>,
        viewer_id: Option<&str>,
    ) -> AppResult<ProfileView> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user @{username}")))?;

        let profile = self.profile_repo.get_by_user_id(&user.id).await?;
        let author = self.author_repo.find_by_user_id(&user.id).await?;
        let works = match &author {
            Some(author) => self.work_repo.find_by_author(&author.id).await?,
            None => vec![],
        };

        let followers_count = self.follow_repo.count_followers(&user.id).await?;
        let following_count = self.follow_repo.count_following(&user.id).await?;
        let is_following = match viewer_id {
            Some(viewer) if viewer != user.id => {
                self.follow_repo.is_following(viewer, &user.id).await?
            }
            _ => false,
        };

        let posts = self
            .post_service
            .by_user(&user.id, limit, until_id, viewer_id)
            .await?;

        Ok(ProfileView {
            user,
            profile,
            author,
            works,
            followers_count,
            following_count,
            is_following,
            posts,
        })
    }

    /// The caller's own profile, for the edit form.
    pub async fn get_own(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// Update the caller's bio and images.
    pub async fn edit(
        &self,
        user_id: &str,
        input: EditProfileInput,
    ) -> AppResult<user_profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: user_profile::ActiveModel = profile.into();

        if let Some(bio) = input.bio {
            active.bio = Set(bio.trim().to_string());
        }
        if let Some(url) = input.profile_image {
            active.profile_image = Set(image_url(url));
        }
        if let Some(url) = input.cover_image {
            active.cover_image = Set(image_url(url));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let profile = self.profile_repo.update(active).await?;
        tracing::debug!(user_id = %user_id, "Updated profile");
        Ok(profile)
    }
}

fn image_url(url: String) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fandoom_db::entities::post;
    use fandoom_db::repositories::{CommentRepository, PostRepository, VoteRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> ProfileService {
        let db = Arc::new(db);
        let post_service = PostService::new(
            PostRepository::new(db.clone()),
            WorkRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
        );
        ProfileService::new(
            UserRepository::new(db.clone()),
            UserProfileRepository::new(db.clone()),
            AuthorRepository::new(db.clone()),
            WorkRepository::new(db.clone()),
            FollowRepository::new(db),
            post_service,
        )
    }

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: "hash".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_profile(user_id: &str) -> user_profile::Model {
        user_profile::Model {
            user_id: user_id.to_string(),
            bio: "Hi".to_string(),
            profile_image: Some("https://img.example/me.png".to_string()),
            cover_image: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count(n: i64) -> [std::collections::BTreeMap<&'static str, Value>; 1] {
        [maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }]
    }

    #[tokio::test]
    async fn test_reader_profile_has_no_works() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("u1", "reader")]])
            .append_query_results([[create_test_profile("u1")]])
            .append_query_results([Vec::<author::Model>::new()])
            .append_query_results([count(3)])
            .append_query_results([count(4)])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let view = service(db).get("Reader", 50, None, None).await.unwrap();

        assert!(view.author.is_none());
        assert!(view.works.is_empty());
        assert_eq!(view.followers_count, 3);
        assert_eq!(view.following_count, 4);
        assert!(!view.is_following);
        assert!(view.posts.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(db).get("ghost", 50, None, None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_edit_clears_image_with_empty_url() {
        let mut updated = create_test_profile("u1");
        updated.profile_image = None;
        updated.bio = "New bio".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_profile("u1")]])
            .append_query_results([[updated]])
            .into_connection();

        let profile = service(db)
            .edit(
                "u1",
                EditProfileInput {
                    bio: Some("New bio".to_string()),
                    profile_image: Some(String::new()),
                    cover_image: None,
                },
            )
            .await
            .unwrap();

        assert!(profile.profile_image.is_none());
        assert_eq!(profile.bio, "New bio");
    }

    #[tokio::test]
    async fn test_edit_rejects_long_bio() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .edit(
                "u1",
                EditProfileInput {
                    bio: Some("b".repeat(2049)),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_image_url() {
        assert_eq!(image_url("  ".to_string()), None);
        assert_eq!(
            image_url(" https://img.example/a.png ".to_string()),
            Some("https://img.example/a.png".to_string())
        );
    }
}
