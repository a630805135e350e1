//! Following endpoints.

use axum::{Router, extract::State, routing::post};
use fandoom_common::AppResult;
use fandoom_db::entities::{follow, work_follow};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Follow author request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowAuthorRequest {
    pub author_id: String,
}

/// Follow work request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowWorkRequest {
    pub work_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub id: String,
    pub created_at: String,
    pub follower_id: String,
    pub followed_id: String,
}

impl From<follow::Model> for FollowResponse {
    fn from(f: follow::Model) -> Self {
        Self {
            id: f.id,
            created_at: f.created_at.to_rfc3339(),
            follower_id: f.follower_id,
            followed_id: f.followed_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkFollowResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub work_id: String,
}

impl From<work_follow::Model> for WorkFollowResponse {
    fn from(f: work_follow::Model) -> Self {
        Self {
            id: f.id,
            created_at: f.created_at.to_rfc3339(),
            user_id: f.user_id,
            work_id: f.work_id,
        }
    }
}

/// Subscription result; `created` is false when the caller already followed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResult<T: Serialize> {
    pub created: bool,
    pub follow: T,
}

/// Follow an author.
async fn follow_author(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FollowAuthorRequest>,
) -> AppResult<ApiResponse<FollowResult<FollowResponse>>> {
    let outcome = state
        .following_service
        .follow_author(&user.id, &req.author_id)
        .await?;

    Ok(ApiResponse::ok(FollowResult {
        created: outcome.created,
        follow: outcome.record.into(),
    }))
}

/// Follow a work.
async fn follow_work(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FollowWorkRequest>,
) -> AppResult<ApiResponse<FollowResult<WorkFollowResponse>>> {
    let outcome = state
        .following_service
        .follow_work(&user.id, &req.work_id)
        .await?;

    Ok(ApiResponse::ok(FollowResult {
        created: outcome.created,
        follow: outcome.record.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow_author", post(follow_author))
        .route("/follow_work", post(follow_work))
}
