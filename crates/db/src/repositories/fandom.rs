//! Fandom repository.

use std::sync::Arc;

use crate::entities::{Fandom, fandom};
use fandoom_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Fandom repository for database operations.
#[derive(Clone)]
pub struct FandomRepository {
    db: Arc<DatabaseConnection>,
}

impl FandomRepository {
    /// Create a new fandom repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a fandom by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<fandom::Model>> {
        Fandom::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a fandom by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<fandom::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("fandom {id}")))
    }

    /// All fandoms, alphabetically.
    pub async fn find_all(&self) -> AppResult<Vec<fandom::Model>> {
        Fandom::find()
            .order_by_asc(fandom::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new fandom.
    pub async fn create(&self, model: fandom::ActiveModel) -> AppResult<fandom::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
