//! Authentication endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use fandoom_common::AppResult;
use fandoom_core::{NextStep, RegisterInput, Session, SigninInput};
use fandoom_db::entities::user;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

/// Public user fields.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Session response, returned by signin and signup.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
    pub is_author: bool,
    pub next: NextStep,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
            is_author: session.is_author,
            next: session.next,
        }
    }
}

/// Landing response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    pub message: &'static str,
}

/// Landing: who am I, and how to sign in.
async fn index(MaybeAuthUser(user): MaybeAuthUser) -> ApiResponse<IndexResponse> {
    let message = if user.is_some() {
        "Welcome back"
    } else {
        "Sign in with POST / or create an account with POST /signup"
    };

    ApiResponse::ok(IndexResponse {
        authenticated: user.is_some(),
        user: user.map(Into::into),
        message,
    })
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SigninInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.account_service.signin(input).await?;
    Ok(ApiResponse::ok(session.into()))
}

/// Create a new account.
async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.account_service.register(input).await?;
    Ok(ApiResponse::created(session.into()))
}

/// Invalidate the caller's token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Empty>> {
    state.account_service.logout(&user.id).await?;
    Ok(ApiResponse::ok(Empty {}))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(signin))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}
