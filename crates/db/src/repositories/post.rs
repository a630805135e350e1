//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use fandoom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))
    }

    /// Find posts by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All posts, newest first (paginated).
    pub async fn find_recent(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        self.page(Post::find(), limit, until_id).await
    }

    /// Posts by a user, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        let query = Post::find().filter(post::Column::UserId.eq(user_id));
        self.page(query, limit, until_id).await
    }

    /// Posts filed under any of `work_ids`, newest first (paginated).
    pub async fn find_by_work_ids(
        &self,
        work_ids: &[String],
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        if work_ids.is_empty() {
            return Ok(vec![]);
        }

        let query = Post::find().filter(post::Column::WorkId.is_in(work_ids.to_vec()));
        self.page(query, limit, until_id).await
    }

    async fn page(
        &self,
        mut query: Select<Post>,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: &str, user_id: &str, work_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            work_id: work_id.to_string(),
            title: "Chapter one".to_string(),
            content: "It was a dark and stormy night".to_string(),
            image: None,
            shared_post_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post("p1", "u1", "w1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let found = repo.find_by_id("p1").await.unwrap().unwrap();

        assert_eq!(found.work_id, "w1");
        assert!(found.has_body());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(matches!(
            repo.get_by_id("gone").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_recent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_post("p3", "u1", "w1"),
                    create_test_post("p2", "u2", "w1"),
                ]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let posts = repo.find_recent(2, Some("p4")).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "p3");
    }

    #[tokio::test]
    async fn test_find_by_work_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let posts = repo.find_by_work_ids(&[], 10, None).await.unwrap();

        assert!(posts.is_empty());
    }

    #[test]
    fn test_has_body() {
        let mut post = create_test_post("p1", "u1", "w1");
        post.content = "   ".to_string();
        assert!(!post.has_body());

        post.image = Some("https://img.example/a.png".to_string());
        assert!(post.has_body());

        post.image = None;
        post.shared_post_id = Some("p0".to_string());
        assert!(post.has_body());
    }
}
