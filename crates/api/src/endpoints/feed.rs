//! Home feed endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use fandoom_common::AppResult;
use fandoom_core::{AuthorSuggestion, CreatePostInput, Feed};
use serde::Serialize;

use super::{
    fandoms::FandomResponse,
    posts::PostResponse,
    works::{AuthorResponse, WorkResponse},
};
use crate::{
    extractors::{ApiJson, AuthUser, PageQuery},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSuggestionResponse {
    pub author: AuthorResponse,
    pub username: String,
}

impl From<AuthorSuggestion> for AuthorSuggestionResponse {
    fn from(suggestion: AuthorSuggestion) -> Self {
        Self {
            author: suggestion.author.into(),
            username: suggestion.username,
        }
    }
}

/// Home feed response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
    pub authors_to_follow: Vec<AuthorSuggestionResponse>,
    pub authors_to_follow_total: u64,
    pub works_to_follow: Vec<WorkResponse>,
    pub works_to_follow_total: u64,
    pub followed_works: Vec<WorkResponse>,
    pub fandoms: Vec<FandomResponse>,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            posts: feed.posts.into_iter().map(Into::into).collect(),
            authors_to_follow: feed.authors_to_follow.into_iter().map(Into::into).collect(),
            authors_to_follow_total: feed.authors_to_follow_total,
            works_to_follow: feed.works_to_follow.into_iter().map(Into::into).collect(),
            works_to_follow_total: feed.works_to_follow_total,
            followed_works: feed.followed_works.into_iter().map(Into::into).collect(),
            fandoms: feed.fandoms.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct PostCreatedResponse {
    pub post: PostResponse,
}

/// Show the home feed.
async fn home(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<FeedResponse>> {
    let limit = state.feed_config.page_size(page.limit);
    let feed = state
        .feed_service
        .home(&user.id, limit, page.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(feed.into()))
}

/// Publish a post from the home page.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> AppResult<ApiResponse<PostCreatedResponse>> {
    let post = state.post_service.create(&user.id, input).await?;

    Ok(ApiResponse::created(PostCreatedResponse { post: post.into() }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/home", get(home).post(create_post))
}
