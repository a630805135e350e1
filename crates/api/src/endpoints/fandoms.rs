//! Fandom endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use fandoom_common::AppResult;
use fandoom_core::{CreateFandomInput, FandomView};
use fandoom_db::entities::fandom;
use serde::Serialize;

use super::{posts::PostResponse, works::WorkResponse};
use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser, PageQuery},
    middleware::AppState,
    response::ApiResponse,
};

/// Fandom response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FandomResponse {
    pub id: String,
    pub created_at: String,
    pub name: String,
    pub description: String,
}

impl From<fandom::Model> for FandomResponse {
    fn from(fandom: fandom::Model) -> Self {
        Self {
            id: fandom.id,
            created_at: fandom.created_at.to_rfc3339(),
            name: fandom.name,
            description: fandom.description,
        }
    }
}

#[derive(Serialize)]
pub struct FandomListResponse {
    pub fandoms: Vec<FandomResponse>,
}

#[derive(Serialize)]
pub struct FandomCreatedResponse {
    pub fandom: FandomResponse,
}

/// Fandom page: the fandom, its works and their posts.
#[derive(Serialize)]
pub struct FandomFeedResponse {
    pub fandom: FandomResponse,
    pub works: Vec<WorkResponse>,
    pub posts: Vec<PostResponse>,
}

impl From<FandomView> for FandomFeedResponse {
    fn from(view: FandomView) -> Self {
        Self {
            fandom: view.fandom.into(),
            works: view.works.into_iter().map(Into::into).collect(),
            posts: view.posts.into_iter().map(Into::into).collect(),
        }
    }
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<FandomListResponse>> {
    let fandoms = state.fandom_service.list().await?;
    Ok(ApiResponse::ok(FandomListResponse {
        fandoms: fandoms.into_iter().map(Into::into).collect(),
    }))
}

async fn create(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateFandomInput>,
) -> AppResult<ApiResponse<FandomCreatedResponse>> {
    let fandom = state.fandom_service.create(input).await?;
    Ok(ApiResponse::created(FandomCreatedResponse {
        fandom: fandom.into(),
    }))
}

/// Fandom-scoped feed.
async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(fandom_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<FandomFeedResponse>> {
    let limit = state.feed_config.page_size(page.limit);
    let view = state
        .fandom_service
        .get(&fandom_id, limit, page.until_id.as_deref(), viewer.id())
        .await?;

    Ok(ApiResponse::ok(view.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fandoms", get(list).post(create))
        .route("/fandom/{id}", get(show))
}
