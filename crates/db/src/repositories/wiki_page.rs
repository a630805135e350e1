//! Wiki page repository.

use std::sync::Arc;

use crate::entities::{WikiPage, wiki_page};
use fandoom_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Wiki page repository for database operations.
#[derive(Clone)]
pub struct WikiPageRepository {
    db: Arc<DatabaseConnection>,
}

impl WikiPageRepository {
    /// Create a new wiki page repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a page by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<wiki_page::Model>> {
        WikiPage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a page by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<wiki_page::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("wiki page {id}")))
    }

    /// All pages, alphabetically by title.
    pub async fn find_all(&self) -> AppResult<Vec<wiki_page::Model>> {
        WikiPage::find()
            .order_by_asc(wiki_page::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new page.
    pub async fn create(&self, model: wiki_page::ActiveModel) -> AppResult<wiki_page::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a page.
    pub async fn update(&self, model: wiki_page::ActiveModel) -> AppResult<wiki_page::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
