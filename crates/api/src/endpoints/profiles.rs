//! Profile endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use fandoom_common::AppResult;
use fandoom_core::{EditProfileInput, ProfileView};
use fandoom_db::entities::user_profile;
use serde::Serialize;

use super::{
    auth::UserResponse,
    posts::PostResponse,
    works::{AuthorResponse, WorkResponse},
};
use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser, PageQuery},
    middleware::AppState,
    response::ApiResponse,
};

/// Editable profile fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub bio: String,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub updated_at: Option<String>,
}

impl From<user_profile::Model> for ProfileDetails {
    fn from(profile: user_profile::Model) -> Self {
        Self {
            bio: profile.bio,
            profile_image: profile.profile_image,
            cover_image: profile.cover_image,
            updated_at: profile.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Public profile page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub profile: ProfileDetails,
    pub author: Option<AuthorResponse>,
    pub works: Vec<WorkResponse>,
    pub followers_count: u64,
    pub following_count: u64,
    pub is_following: bool,
    pub posts: Vec<PostResponse>,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            user: view.user.into(),
            profile: view.profile.into(),
            author: view.author.map(Into::into),
            works: view.works.into_iter().map(Into::into).collect(),
            followers_count: view.followers_count,
            following_count: view.following_count,
            is_following: view.is_following,
            posts: view.posts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct OwnProfileResponse {
    pub profile: ProfileDetails,
}

/// Show a user's profile.
async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let limit = state.feed_config.page_size(page.limit);
    let view = state
        .profile_service
        .get(&username, limit, page.until_id.as_deref(), viewer.id())
        .await?;

    Ok(ApiResponse::ok(view.into()))
}

/// The caller's editable profile.
async fn edit_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<OwnProfileResponse>> {
    let profile = state.profile_service.get_own(&user.id).await?;
    Ok(ApiResponse::ok(OwnProfileResponse {
        profile: profile.into(),
    }))
}

/// Update the caller's profile.
async fn edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EditProfileInput>,
) -> AppResult<ApiResponse<OwnProfileResponse>> {
    let profile = state.profile_service.edit(&user.id, input).await?;
    Ok(ApiResponse::ok(OwnProfileResponse {
        profile: profile.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        // Static segment wins over the username capture
        .route("/profile/edit", get(edit_form).post(edit))
        .route("/profile/{username}", get(show))
}
