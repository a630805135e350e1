//! Work repository.

use std::sync::Arc;

use crate::entities::{Work, work};
use fandoom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};

/// Work repository for database operations.
#[derive(Clone)]
pub struct WorkRepository {
    db: Arc<DatabaseConnection>,
}

impl WorkRepository {
    /// Create a new work repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a work by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<work::Model>> {
        Work::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a work by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<work::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("work {id}")))
    }

    /// Find works by IDs, newest first.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<work::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Work::find()
            .filter(work::Column::Id.is_in(ids.to_vec()))
            .order_by_desc(work::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Works owned by an author, newest first.
    pub async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<work::Model>> {
        Work::find()
            .filter(work::Column::AuthorId.eq(author_id))
            .order_by_desc(work::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the works filed under a fandom.
    pub async fn find_ids_by_fandom(&self, fandom_id: &str) -> AppResult<Vec<String>> {
        Work::find()
            .select_only()
            .column(work::Column::Id)
            .filter(work::Column::FandomId.eq(fandom_id))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Start a transaction on the repository's connection.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new work.
    pub async fn create(&self, model: work::ActiveModel) -> AppResult<work::Model> {
        Self::create_in(self.db.as_ref(), model).await
    }

    /// Create a work on the given connection or transaction.
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        model: work::ActiveModel,
    ) -> AppResult<work::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a work.
    pub async fn update(&self, model: work::ActiveModel) -> AppResult<work::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Works outside `excluded_ids` and not owned by `excluded_author_id`, newest first.
    pub async fn find_excluding(
        &self,
        excluded_ids: &[String],
        excluded_author_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<work::Model>> {
        Self::excluding(excluded_ids, excluded_author_id)
            .order_by_desc(work::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the works [`Self::find_excluding`] would page through.
    pub async fn count_excluding(
        &self,
        excluded_ids: &[String],
        excluded_author_id: Option<&str>,
    ) -> AppResult<u64> {
        Self::excluding(excluded_ids, excluded_author_id)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn excluding(excluded_ids: &[String], excluded_author_id: Option<&str>) -> Select<Work> {
        let mut query = Work::find();
        if !excluded_ids.is_empty() {
            query = query.filter(work::Column::Id.is_not_in(excluded_ids.to_vec()));
        }
        if let Some(author_id) = excluded_author_id {
            query = query.filter(work::Column::AuthorId.ne(author_id));
        }
        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::work::{Audience, Genre};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_work(id: &str, author_id: &str, fandom_id: Option<&str>) -> work::Model {
        work::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            title: format!("Work {id}"),
            description: String::new(),
            genre: Genre::Fantasy,
            audience: Audience::Teen,
            fandom_id: fandom_id.map(ToString::to_string),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let work = create_test_work("w1", "a1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[work]])
                .into_connection(),
        );

        let repo = WorkRepository::new(db);
        let found = repo.get_by_id("w1").await.unwrap();

        assert_eq!(found.title, "Work w1");
        assert_eq!(found.genre, Genre::Fantasy);
        assert_eq!(found.audience, Audience::Teen);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<work::Model>::new()])
                .into_connection(),
        );

        let repo = WorkRepository::new(db);
        assert!(matches!(
            repo.get_by_id("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_work("w2", "a1", None),
                    create_test_work("w1", "a1", Some("f1")),
                ]])
                .into_connection(),
        );

        let repo = WorkRepository::new(db);
        let works = repo.find_by_author("a1").await.unwrap();

        assert_eq!(works.len(), 2);
        assert!(works.iter().all(|w| w.author_id == "a1"));
    }

    #[tokio::test]
    async fn test_find_ids_by_fandom() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "id" => Value::from("w1") },
                    maplit::btreemap! { "id" => Value::from("w4") },
                ]])
                .into_connection(),
        );

        let repo = WorkRepository::new(db);
        let ids = repo.find_ids_by_fandom("f1").await.unwrap();

        assert_eq!(ids, vec!["w1".to_string(), "w4".to_string()]);
    }

    #[tokio::test]
    async fn test_count_excluding() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = WorkRepository::new(db);
        let count = repo
            .count_excluding(&["w1".to_string()], Some("a1"))
            .await
            .unwrap();

        assert_eq!(count, 3);
    }
}
