//! Following service: author and work subscriptions.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::{follow, work_follow},
    repositories::{AuthorRepository, FollowRepository, WorkFollowRepository, WorkRepository},
};
use sea_orm::Set;

/// Result of a subscribe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowOutcome<T> {
    /// The subscription row, new or pre-existing.
    pub record: T,
    /// Whether this call created it.
    pub created: bool,
}

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    follow_repo: FollowRepository,
    work_follow_repo: WorkFollowRepository,
    author_repo: AuthorRepository,
    work_repo: WorkRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        work_follow_repo: WorkFollowRepository,
        author_repo: AuthorRepository,
        work_repo: WorkRepository,
    ) -> Self {
        Self {
            follow_repo,
            work_follow_repo,
            author_repo,
            work_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author. Following twice is a no-op.
    pub async fn follow_author(
        &self,
        user_id: &str,
        author_id: &str,
    ) -> AppResult<FollowOutcome<follow::Model>> {
        let author = self.author_repo.get_by_id(author_id).await?;

        if author.user_id == user_id {
            return Err(AppError::Validation("You cannot follow yourself".to_string()));
        }

        if let Some(existing) = self.follow_repo.find_by_pair(user_id, &author.user_id).await? {
            return Ok(FollowOutcome {
                record: existing,
                created: false,
            });
        }

        self.create_follow(user_id, &author.user_id).await
    }

    /// Follow a work. Following twice is a no-op.
    pub async fn follow_work(
        &self,
        user_id: &str,
        work_id: &str,
    ) -> AppResult<FollowOutcome<work_follow::Model>> {
        let work = self.work_repo.get_by_id(work_id).await?;

        if let Some(existing) = self.work_follow_repo.find_by_pair(user_id, &work.id).await? {
            return Ok(FollowOutcome {
                record: existing,
                created: false,
            });
        }

        self.create_work_follow(user_id, &work.id).await
    }

    /// Insert a follow of the user `followed_id`.
    ///
    /// When a concurrent request inserted the same pair first, the surviving
    /// row is returned with `created == false`.
    pub async fn create_follow(
        &self,
        user_id: &str,
        followed_id: &str,
    ) -> AppResult<FollowOutcome<follow::Model>> {
        let created = self
            .follow_repo
            .create(follow::ActiveModel {
                id: Set(self.id_gen.generate()),
                follower_id: Set(user_id.to_string()),
                followed_id: Set(followed_id.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await;

        match created {
            Ok(record) => {
                tracing::debug!(follower_id = %user_id, followed_id = %followed_id, "Followed author");
                Ok(FollowOutcome {
                    record,
                    created: true,
                })
            }
            Err(AppError::Conflict(_)) => {
                let record = self
                    .follow_repo
                    .find_by_pair(user_id, followed_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal("follow vanished after unique violation".to_string())
                    })?;
                Ok(FollowOutcome {
                    record,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Insert a follow of `work_id`, returning the surviving row on a lost race.
    pub async fn create_work_follow(
        &self,
        user_id: &str,
        work_id: &str,
    ) -> AppResult<FollowOutcome<work_follow::Model>> {
        let created = self
            .work_follow_repo
            .create(work_follow::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                work_id: Set(work_id.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await;

        match created {
            Ok(record) => {
                tracing::debug!(user_id = %user_id, work_id = %work_id, "Followed work");
                Ok(FollowOutcome {
                    record,
                    created: true,
                })
            }
            Err(AppError::Conflict(_)) => {
                let record = self
                    .work_follow_repo
                    .find_by_pair(user_id, work_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal("work follow vanished after unique violation".to_string())
                    })?;
                Ok(FollowOutcome {
                    record,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Follower and following counts of a user.
    pub async fn counts(&self, user_id: &str) -> AppResult<(u64, u64)> {
        let followers = self.follow_repo.count_followers(user_id).await?;
        let following = self.follow_repo.count_following(user_id).await?;
        Ok((followers, following))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fandoom_db::entities::{author, work};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> FollowingService {
        let db = Arc::new(db);
        FollowingService::new(
            FollowRepository::new(db.clone()),
            WorkFollowRepository::new(db.clone()),
            AuthorRepository::new(db.clone()),
            WorkRepository::new(db),
        )
    }

    fn create_test_author(id: &str, user_id: &str) -> author::Model {
        author::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            bio: String::new(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_follow(follower_id: &str, followed_id: &str) -> follow::Model {
        follow::Model {
            id: "f1".to_string(),
            follower_id: follower_id.to_string(),
            followed_id: followed_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_work(id: &str) -> work::Model {
        work::Model {
            id: id.to_string(),
            author_id: "a1".to_string(),
            title: "Saga".to_string(),
            description: String::new(),
            genre: work::Genre::default(),
            audience: work::Audience::default(),
            fandom_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_follow_author_creates_edge_to_author_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_author("a1", "writer")]])
            .append_query_results([Vec::<follow::Model>::new()])
            .append_query_results([[create_test_follow("reader", "writer")]])
            .into_connection();

        let outcome = service(db).follow_author("reader", "a1").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.record.followed_id, "writer");
    }

    #[tokio::test]
    async fn test_follow_author_twice_returns_existing() {
        // No insert result is queued, so an insert would fail
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_author("a1", "writer")]])
            .append_query_results([[create_test_follow("reader", "writer")]])
            .into_connection();

        let outcome = service(db).follow_author("reader", "a1").await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.record.id, "f1");
    }

    #[tokio::test]
    async fn test_follow_self_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_author("a1", "writer")]])
            .into_connection();

        let result = service(db).follow_author("writer", "a1").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_follow_unknown_author() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<author::Model>::new()])
            .into_connection();

        let result = service(db).follow_author("reader", "nobody").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_work() {
        let follow = work_follow::Model {
            id: "wf1".to_string(),
            user_id: "reader".to_string(),
            work_id: "w1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_work("w1")]])
            .append_query_results([Vec::<work_follow::Model>::new()])
            .append_query_results([[follow]])
            .into_connection();

        let outcome = service(db).follow_work("reader", "w1").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.record.work_id, "w1");
    }

    #[tokio::test]
    async fn test_follow_unknown_work() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<work::Model>::new()])
            .into_connection();

        let result = service(db).follow_work("reader", "w404").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
