//! Post endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use fandoom_common::AppResult;
use fandoom_core::{AddCommentInput, PostDetail, PostView};
use fandoom_db::entities::{comment, post, vote::VoteType};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub work_id: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub shared_post_id: Option<String>,
    pub score: i64,
    pub my_vote: Option<VoteType>,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let mut response = Self::from(view.post);
        response.score = view.score;
        response.my_vote = view.my_vote;
        response
    }
}

/// A freshly created post has no votes.
impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at.to_rfc3339(),
            user_id: post.user_id,
            work_id: post.work_id,
            title: post.title,
            content: post.content,
            image: post.image,
            shared_post_id: post.shared_post_id,
            score: 0,
            my_vote: None,
        }
    }
}

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub post_id: String,
    pub content: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            created_at: comment.created_at.to_rfc3339(),
            user_id: comment.user_id,
            post_id: comment.post_id,
            content: comment.content,
        }
    }
}

/// Post detail response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub shared_post: Option<PostResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<PostDetail> for PostDetailResponse {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            shared_post: detail.shared_post.map(Into::into),
            comments: detail.comments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct CommentCreatedResponse {
    pub comment: CommentResponse,
}

/// Show a post with its comments.
async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let detail = state.post_service.get_detail(&post_id, viewer.id()).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Comment on a post.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ApiJson(input): ApiJson<AddCommentInput>,
) -> AppResult<ApiResponse<CommentCreatedResponse>> {
    let comment = state
        .comment_service
        .add(&user.id, &post_id, input)
        .await?;

    Ok(ApiResponse::created(CommentCreatedResponse {
        comment: comment.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/post/{id}", get(show).post(add_comment))
}
