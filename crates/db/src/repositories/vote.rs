//! Vote repository.

use std::collections::HashMap;
use std::sync::Arc;

use super::map_insert_error;
use crate::entities::{
    Vote,
    vote::{self, VoteType},
};
use chrono::Utc;
use fandoom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Set,
};

/// Summed vote value of one post.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PostScore {
    /// The post.
    pub post_id: String,
    /// Sum of the post's vote values; `None` only for an empty group.
    pub score: Option<i64>,
}

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the vote a user cast on a post.
    pub async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Votes a user cast on any of `post_ids`.
    pub async fn find_by_user_and_posts(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> AppResult<Vec<vote::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PostId.is_in(post_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a vote. A second vote for the same (user, post) is a conflict.
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_error)
    }

    /// Overwrite the direction of an existing vote.
    pub async fn set_type(&self, existing: vote::Model, kind: VoteType) -> AppResult<vote::Model> {
        let mut active = existing.into_active_model();
        active.vote_type = Set(kind.value());
        active.updated_at = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a vote by ID. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Vote::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Count a post's votes in one direction.
    pub async fn count_by_post_and_type(&self, post_id: &str, kind: VoteType) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::VoteType.eq(kind.value()))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Scores of many posts in one grouped query.
    ///
    /// Posts without votes are absent from the map and score zero.
    pub async fn scores_for_posts(&self, post_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Vote::find()
            .select_only()
            .column(vote::Column::PostId)
            .column_as(vote::Column::VoteType.sum(), "score")
            .filter(vote::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(vote::Column::PostId)
            .into_model::<PostScore>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.post_id, row.score.unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_vote(id: &str, user_id: &str, post_id: &str, kind: VoteType) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            vote_type: kind.value(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_post() {
        let vote = create_test_vote("v1", "u1", "p1", VoteType::Down);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let found = repo.find_by_user_and_post("u1", "p1").await.unwrap().unwrap();

        assert_eq!(found.kind(), Some(VoteType::Down));
    }

    #[tokio::test]
    async fn test_set_type_flips_direction() {
        let before = create_test_vote("v1", "u1", "p1", VoteType::Up);
        let mut after = before.clone();
        after.vote_type = VoteType::Down.value();
        after.updated_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[after]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let updated = repo.set_type(before, VoteType::Down).await.unwrap();

        assert_eq!(updated.kind(), Some(VoteType::Down));
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        assert!(repo.delete("v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_post_and_type() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let ups = repo
            .count_by_post_and_type("p1", VoteType::Up)
            .await
            .unwrap();

        assert_eq!(ups, 4);
    }

    #[tokio::test]
    async fn test_scores_for_posts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "post_id" => Value::from("p1"),
                        "score" => Value::BigInt(Some(3)),
                    },
                    maplit::btreemap! {
                        "post_id" => Value::from("p2"),
                        "score" => Value::BigInt(Some(-2)),
                    },
                ]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let scores = repo
            .scores_for_posts(&["p1".to_string(), "p2".to_string(), "p3".to_string()])
            .await
            .unwrap();

        assert_eq!(scores.get("p1"), Some(&3));
        assert_eq!(scores.get("p2"), Some(&-2));
        assert_eq!(scores.get("p3"), None);
    }

    #[tokio::test]
    async fn test_scores_for_no_posts_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = VoteRepository::new(db);
        assert!(repo.scores_for_posts(&[]).await.unwrap().is_empty());
    }
}
