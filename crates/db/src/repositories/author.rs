//! Author repository.

use std::sync::Arc;

use super::map_insert_error;
use crate::entities::{Author, author};
use fandoom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

/// Author repository for database operations.
#[derive(Clone)]
pub struct AuthorRepository {
    db: Arc<DatabaseConnection>,
}

impl AuthorRepository {
    /// Create a new author repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an author by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<author::Model>> {
        Author::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an author by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<author::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author {id}")))
    }

    /// Find the author record of a user, if the user is an author.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<author::Model>> {
        Author::find()
            .filter(author::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find authors by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<author::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Author::find()
            .filter(author::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new author. A second author for the same user is a conflict.
    pub async fn create(&self, model: author::ActiveModel) -> AppResult<author::Model> {
        Self::create_in(self.db.as_ref(), model).await
    }

    /// Create an author on the given connection or transaction.
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        model: author::ActiveModel,
    ) -> AppResult<author::Model> {
        model.insert(conn).await.map_err(map_insert_error)
    }

    /// Update an author.
    pub async fn update(&self, model: author::ActiveModel) -> AppResult<author::Model> {
        Self::update_in(self.db.as_ref(), model).await
    }

    /// Update an author on the given connection or transaction.
    pub async fn update_in<C: ConnectionTrait>(
        conn: &C,
        model: author::ActiveModel,
    ) -> AppResult<author::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Authors whose user is not in `excluded_user_ids`, newest first.
    pub async fn find_excluding_users(
        &self,
        excluded_user_ids: &[String],
        limit: u64,
    ) -> AppResult<Vec<author::Model>> {
        Self::excluding_users(excluded_user_ids)
            .order_by_desc(author::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count authors whose user is not in `excluded_user_ids`.
    pub async fn count_excluding_users(&self, excluded_user_ids: &[String]) -> AppResult<u64> {
        Self::excluding_users(excluded_user_ids)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn excluding_users(excluded_user_ids: &[String]) -> Select<Author> {
        let query = Author::find();
        if excluded_user_ids.is_empty() {
            query
        } else {
            query.filter(author::Column::UserId.is_not_in(excluded_user_ids.to_vec()))
        }
    }
}
