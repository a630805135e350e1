//! Comment service.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for commenting on a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentInput {
    #[validate(length(min = 1, max = 4096))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on a post.
    pub async fn add(
        &self,
        user_id: &str,
        post_id: &str,
        input: AddCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        let post = self.post_repo.get_by_id(post_id).await?;

        let comment = self
            .comment_repo
            .create(comment::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                post_id: Set(post.id),
                content: Set(content.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        tracing::debug!(comment_id = %comment.id, post_id = %post_id, "Added comment");
        Ok(comment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fandoom_db::entities::post;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> CommentService {
        let db = Arc::new(db);
        CommentService::new(CommentRepository::new(db.clone()), PostRepository::new(db))
    }

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            work_id: "w1".to_string(),
            title: "Title".to_string(),
            content: "Body".to_string(),
            image: None,
            shared_post_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_comment() {
        let stored = comment::Model {
            id: "c1".to_string(),
            user_id: "u2".to_string(),
            post_id: "p1".to_string(),
            content: "Loved it".to_string(),
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1")]])
            .append_query_results([[stored]])
            .into_connection();

        let comment = service(db)
            .add(
                "u2",
                "p1",
                AddCommentInput {
                    content: "  Loved it  ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(comment.content, "Loved it");
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .add(
                "u2",
                "p1",
                AddCommentInput {
                    content: "    ".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_oversized_comment_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .add(
                "u2",
                "p1",
                AddCommentInput {
                    content: "x".repeat(4097),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let result = service(db)
            .add(
                "u2",
                "nope",
                AddCommentInput {
                    content: "Hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
