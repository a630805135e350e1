//! Vote endpoint.

use axum::{Router, extract::State, routing::post};
use fandoom_common::AppResult;
use fandoom_core::{VoteInput, VoteOutcome};
use fandoom_db::entities::vote::VoteType;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Vote response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub post_id: String,
    pub score: i64,
    pub upvotes: u64,
    pub downvotes: u64,
    /// `up`, `down` or null after an un-vote
    pub user_vote: Option<VoteType>,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            post_id: outcome.post_id,
            score: outcome.score,
            upvotes: outcome.upvotes,
            downvotes: outcome.downvotes,
            user_vote: outcome.user_vote,
        }
    }
}

/// Toggle the caller's vote on a post.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VoteInput>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let outcome = state.vote_service.cast(&user.id, input).await?;
    Ok(ApiResponse::ok(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/vote", post(vote))
}
