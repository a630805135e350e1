//! Work management endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use fandoom_common::AppResult;
use fandoom_core::{NextStep, RegisterWorkInput, WorkInput, WorkRegistration, WorkView};
use fandoom_db::entities::{
    author,
    work::{self, Audience, Genre},
};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Author response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub bio: String,
}

impl From<author::Model> for AuthorResponse {
    fn from(author: author::Model) -> Self {
        Self {
            id: author.id,
            created_at: author.created_at.to_rfc3339(),
            user_id: author.user_id,
            bio: author.bio,
        }
    }
}

/// Work response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub audience: Audience,
    pub fandom_id: Option<String>,
}

impl From<work::Model> for WorkResponse {
    fn from(work: work::Model) -> Self {
        Self {
            id: work.id,
            created_at: work.created_at.to_rfc3339(),
            updated_at: work.updated_at.map(|dt| dt.to_rfc3339()),
            author_id: work.author_id,
            title: work.title,
            description: work.description,
            genre: work.genre,
            audience: work.audience,
            fandom_id: work.fandom_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub author: AuthorResponse,
    pub works: Vec<WorkResponse>,
}

impl From<WorkRegistration> for RegistrationResponse {
    fn from(registration: WorkRegistration) -> Self {
        Self {
            author: registration.author.into(),
            works: registration.works.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRegisteredResponse {
    pub work: WorkResponse,
    pub next: NextStep,
}

#[derive(Serialize)]
pub struct WorkSavedResponse {
    pub work: WorkResponse,
}

/// Work page response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetailResponse {
    pub work: WorkResponse,
    pub author: AuthorResponse,
    pub followers_count: u64,
    pub is_following: bool,
}

impl From<WorkView> for WorkDetailResponse {
    fn from(view: WorkView) -> Self {
        Self {
            work: view.work.into(),
            author: view.author.into(),
            followers_count: view.followers_count,
            is_following: view.is_following,
        }
    }
}

/// The registration step shown to new authors.
async fn registration(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    let registration = state.work_service.registration(&user.id).await?;
    Ok(ApiResponse::ok(registration.into()))
}

/// Register the caller's first work.
async fn register_work(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterWorkInput>,
) -> AppResult<ApiResponse<WorkRegisteredResponse>> {
    let work = state.work_service.register_work(&user.id, input).await?;

    Ok(ApiResponse::created(WorkRegisteredResponse {
        work: work.into(),
        next: NextStep::Home,
    }))
}

/// Add a work to the caller's catalog.
async fn add_work(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<WorkInput>,
) -> AppResult<ApiResponse<WorkSavedResponse>> {
    let work = state.work_service.add(&user.id, input).await?;
    Ok(ApiResponse::created(WorkSavedResponse { work: work.into() }))
}

/// Show a work.
async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(work_id): Path<String>,
) -> AppResult<ApiResponse<WorkDetailResponse>> {
    let view = state.work_service.get(&work_id, viewer.id()).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Edit one of the caller's works.
async fn edit_work(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(work_id): Path<String>,
    ApiJson(input): ApiJson<WorkInput>,
) -> AppResult<ApiResponse<WorkSavedResponse>> {
    let work = state.work_service.edit(&user.id, &work_id, input).await?;
    Ok(ApiResponse::ok(WorkSavedResponse { work: work.into() }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/author_work_register",
            get(registration).post(register_work),
        )
        .route("/work/add", post(add_work))
        .route("/work/{id}", get(show))
        .route("/work/{id}/edit", post(edit_work))
}
