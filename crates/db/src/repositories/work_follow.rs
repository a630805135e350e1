//! Work follow repository.

use std::sync::Arc;

use super::map_insert_error;
use crate::entities::{WorkFollow, work_follow};
use fandoom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};

/// Work follow repository for database operations.
#[derive(Clone)]
pub struct WorkFollowRepository {
    db: Arc<DatabaseConnection>,
}

impl WorkFollowRepository {
    /// Create a new work follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subscription by user and work.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        work_id: &str,
    ) -> AppResult<Option<work_follow::Model>> {
        WorkFollow::find()
            .filter(work_follow::Column::UserId.eq(user_id))
            .filter(work_follow::Column::WorkId.eq(work_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a subscription. An existing pair surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: work_follow::ActiveModel) -> AppResult<work_follow::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_error)
    }

    /// IDs of the works a user follows.
    pub async fn find_work_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        WorkFollow::find()
            .select_only()
            .column(work_follow::Column::WorkId)
            .filter(work_follow::Column::UserId.eq(user_id))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a work.
    pub async fn count_by_work(&self, work_id: &str) -> AppResult<u64> {
        WorkFollow::find()
            .filter(work_follow::Column::WorkId.eq(work_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
