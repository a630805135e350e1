//! Wiki endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use fandoom_common::AppResult;
use fandoom_core::WikiPageInput;
use fandoom_db::entities::wiki_page;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Wiki page response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPageResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub title: String,
    pub content: String,
}

impl From<wiki_page::Model> for WikiPageResponse {
    fn from(page: wiki_page::Model) -> Self {
        Self {
            id: page.id,
            created_at: page.created_at.to_rfc3339(),
            updated_at: page.updated_at.to_rfc3339(),
            title: page.title,
            content: page.content,
        }
    }
}

#[derive(Serialize)]
pub struct WikiListResponse {
    pub pages: Vec<WikiPageResponse>,
}

#[derive(Serialize)]
pub struct WikiPageBody {
    pub page: WikiPageResponse,
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<WikiListResponse>> {
    let pages = state.wiki_service.list().await?;
    Ok(ApiResponse::ok(WikiListResponse {
        pages: pages.into_iter().map(Into::into).collect(),
    }))
}

async fn create(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<WikiPageInput>,
) -> AppResult<ApiResponse<WikiPageBody>> {
    let page = state.wiki_service.create(input).await?;
    Ok(ApiResponse::created(WikiPageBody { page: page.into() }))
}

async fn show(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> AppResult<ApiResponse<WikiPageBody>> {
    let page = state.wiki_service.get(&page_id).await?;
    Ok(ApiResponse::ok(WikiPageBody { page: page.into() }))
}

async fn update(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    ApiJson(input): ApiJson<WikiPageInput>,
) -> AppResult<ApiResponse<WikiPageBody>> {
    let page = state.wiki_service.update(&page_id, input).await?;
    Ok(ApiResponse::ok(WikiPageBody { page: page.into() }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wiki", get(list).post(create))
        .route("/wiki/{id}", get(show).post(update))
}
