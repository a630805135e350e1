//! Vote service: idempotent up/down toggling.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::vote::{self, VoteType},
    repositories::{PostRepository, VoteRepository},
};
use sea_orm::Set;
use serde::Deserialize;

/// Input for casting a vote.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInput {
    pub post_id: String,
    /// `up` or `down`
    pub vote_type: String,
}

/// Tally of a post after a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub post_id: String,
    pub score: i64,
    pub upvotes: u64,
    pub downvotes: u64,
    /// The caller's vote after the toggle.
    pub user_vote: Option<VoteType>,
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(vote_repo: VoteRepository, post_repo: PostRepository) -> Self {
        Self {
            vote_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Parse a client vote and apply it.
    pub async fn cast(&self, user_id: &str, input: VoteInput) -> AppResult<VoteOutcome> {
        let kind = VoteType::parse(&input.vote_type).ok_or_else(|| {
            AppError::Validation(format!("Invalid vote type: {}", input.vote_type))
        })?;

        self.toggle(user_id, &input.post_id, kind).await
    }

    /// Apply a vote.
    ///
    /// No vote yet creates one, the same vote again removes it, and the
    /// opposite vote flips it in place.
    pub async fn toggle(
        &self,
        user_id: &str,
        post_id: &str,
        kind: VoteType,
    ) -> AppResult<VoteOutcome> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let current = self
            .vote_repo
            .find_by_user_and_post(user_id, &post.id)
            .await?;
        let user_vote = self.toggle_from(user_id, &post.id, current, kind).await?;

        let (upvotes, downvotes) = self.tally(&post.id).await?;

        Ok(VoteOutcome {
            post_id: post.id,
            score: upvotes as i64 - downvotes as i64,
            upvotes,
            downvotes,
            user_vote,
        })
    }

    /// Up and down vote counts of a post.
    pub async fn tally(&self, post_id: &str) -> AppResult<(u64, u64)> {
        let up = self
            .vote_repo
            .count_by_post_and_type(post_id, VoteType::Up)
            .await?;
        let down = self
            .vote_repo
            .count_by_post_and_type(post_id, VoteType::Down)
            .await?;
        Ok((up, down))
    }

    /// Apply a vote against `current`, the caller's vote as last read.
    ///
    /// If a concurrent request inserted a vote after `current` was read, the
    /// row is read again and the toggle runs once more against it.
    pub async fn toggle_from(
        &self,
        user_id: &str,
        post_id: &str,
        current: Option<vote::Model>,
        kind: VoteType,
    ) -> AppResult<Option<VoteType>> {
        match self.apply(user_id, post_id, current, kind).await {
            Err(AppError::Conflict(_)) => {
                tracing::debug!(user_id = %user_id, post_id = %post_id, "Vote insert raced, retrying");
                let current = self
                    .vote_repo
                    .find_by_user_and_post(user_id, post_id)
                    .await?;
                self.apply(user_id, post_id, current, kind).await
            }
            other => other,
        }
    }

    async fn apply(
        &self,
        user_id: &str,
        post_id: &str,
        current: Option<vote::Model>,
        kind: VoteType,
    ) -> AppResult<Option<VoteType>> {
        match current {
            None => {
                self.vote_repo
                    .create(vote::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(user_id.to_string()),
                        post_id: Set(post_id.to_string()),
                        vote_type: Set(kind.value()),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                    })
                    .await?;
                Ok(Some(kind))
            }
            Some(existing) if existing.kind() == Some(kind) => {
                self.vote_repo.delete(&existing.id).await?;
                Ok(None)
            }
            Some(existing) => {
                self.vote_repo.set_type(existing, kind).await?;
                Ok(Some(kind))
            }
        }
    }
}
