//! Fandom service.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::{fandom, work},
    repositories::{FandomRepository, WorkRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::post::{PostService, PostView};

/// Input for creating a fandom.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFandomInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 4096))]
    pub description: String,
}

/// A fandom page: its works and the posts filed under them.
#[derive(Debug, Clone)]
pub struct FandomView {
    pub fandom: fandom::Model,
    pub works: Vec<work::Model>,
    pub posts: Vec<PostView>,
}

/// Fandom service for business logic.
#[derive(Clone)]
pub struct FandomService {
    fandom_repo: FandomRepository,
    work_repo: WorkRepository,
    post_service: PostService,
    id_gen: IdGenerator,
}

impl FandomService {
    /// Create a new fandom service.
    #[must_use]
    pub const fn new(
        fandom_repo: FandomRepository,
        work_repo: WorkRepository,
        post_service: PostService,
    ) -> Self {
        Self {
            fandom_repo,
            work_repo,
            post_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// All fandoms, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<fandom::Model>> {
        self.fandom_repo.find_all().await
    }

    /// Create a fandom.
    pub async fn create(&self, input: CreateFandomInput) -> AppResult<fandom::Model> {
        input.validate()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("A fandom needs a name".to_string()));
        }

        let fandom = self
            .fandom_repo
            .create(fandom::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                description: Set(input.description.trim().to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        tracing::info!(fandom_id = %fandom.id, name = %fandom.name, "Created fandom");
        Ok(fandom)
    }

    /// Load a fandom with the posts attached to its works, newest first.
    pub async fn get(
        &self,
        fandom_id: &str,
        limit: u64,
        until_id: Option<&str>,
        viewer_id: Option<&str>,
    ) -> AppResult<FandomView> {
        let fandom = self.fandom_repo.get_by_id(fandom_id).await?;
        let work_ids = self.work_repo.find_ids_by_fandom(&fandom.id).await?;
        let works = self.work_repo.find_by_ids(&work_ids).await?;
        let posts = self
            .post_service
            .by_works(&work_ids, limit, until_id, viewer_id)
            .await?;

        Ok(FandomView {
            fandom,
            works,
            posts,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fandoom_db::repositories::{CommentRepository, PostRepository, VoteRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> FandomService {
        let db = Arc::new(db);
        let post_service = PostService::new(
            PostRepository::new(db.clone()),
            WorkRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
        );
        FandomService::new(
            FandomRepository::new(db.clone()),
            WorkRepository::new(db),
            post_service,
        )
    }

    fn create_test_fandom(id: &str, name: &str) -> fandom::Model {
        fandom::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_fandom("f1", "Star Voyage")]])
            .into_connection();

        let fandom = service(db)
            .create(CreateFandomInput {
                name: "  Star Voyage ".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(fandom.name, "Star Voyage");
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(CreateFandomInput {
                name: "   ".to_string(),
                description: "no name".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_fandom_without_works() {
        // No works means no post query at all
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_fandom("f1", "Quiet Fandom")]])
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .into_connection();

        let view = service(db).get("f1", 50, None, None).await.unwrap();

        assert_eq!(view.fandom.name, "Quiet Fandom");
        assert!(view.works.is_empty());
        assert!(view.posts.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_fandom() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<fandom::Model>::new()])
            .into_connection();

        let result = service(db).get("f404", 50, None, None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
