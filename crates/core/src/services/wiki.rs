//! Wiki service.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{entities::wiki_page, repositories::WikiPageRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating or updating a wiki page.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WikiPageInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100_000))]
    pub content: String,
}

impl WikiPageInput {
    fn trimmed(&self) -> AppResult<(String, String)> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(
                "Wiki pages need a title and content".to_string(),
            ));
        }
        Ok((title.to_string(), content.to_string()))
    }
}

/// Wiki service for business logic.
#[derive(Clone)]
pub struct WikiService {
    wiki_repo: WikiPageRepository,
    id_gen: IdGenerator,
}

impl WikiService {
    /// Create a new wiki service.
    #[must_use]
    pub const fn new(wiki_repo: WikiPageRepository) -> Self {
        Self {
            wiki_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<wiki_page::Model> {
        self.wiki_repo.get_by_id(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<wiki_page::Model>> {
        self.wiki_repo.find_all().await
    }

    pub async fn create(&self, input: WikiPageInput) -> AppResult<wiki_page::Model> {
        input.validate()?;
        let (title, content) = input.trimmed()?;
        let now = Utc::now();

        self.wiki_repo
            .create(wiki_page::ActiveModel {
                id: Set(self.id_gen.generate()),
                title: Set(title),
                content: Set(content),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await
    }

    /// Replace a page's title and content.
    pub async fn update(&self, id: &str, input: WikiPageInput) -> AppResult<wiki_page::Model> {
        input.validate()?;
        let (title, content) = input.trimmed()?;

        let page = self.wiki_repo.get_by_id(id).await?;
        let mut active: wiki_page::ActiveModel = page.into();
        active.title = Set(title);
        active.content = Set(content);
        active.updated_at = Set(Utc::now().into());

        self.wiki_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> WikiService {
        WikiService::new(WikiPageRepository::new(Arc::new(db)))
    }

    fn create_test_page(id: &str, title: &str) -> wiki_page::Model {
        let now = Utc::now();
        wiki_page::Model {
            id: id.to_string(),
            title: title.to_string(),
            content: "Content".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let original = create_test_page("wp1", "Old");
        let mut updated = original.clone();
        updated.title = "New".to_string();
        updated.updated_at = (Utc::now() + chrono::Duration::seconds(5)).into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[original.clone()]])
            .append_query_results([[updated]])
            .into_connection();

        let page = service(db)
            .update(
                "wp1",
                WikiPageInput {
                    title: "New".to_string(),
                    content: "Content".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(page.title, "New");
        assert!(page.updated_at > original.updated_at);
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(WikiPageInput {
                title: "Empty".to_string(),
                content: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<wiki_page::Model>::new()])
            .into_connection();

        let result = service(db)
            .update(
                "wp404",
                WikiPageInput {
                    title: "T".to_string(),
                    content: "C".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
