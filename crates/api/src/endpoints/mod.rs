//! API endpoints.

mod auth;
mod fandoms;
mod feed;
mod following;
mod posts;
mod profiles;
mod votes;
mod wiki;
mod works;

use axum::Router;
use fandoom_common::AppError;

use crate::middleware::AppState;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(feed::router())
        .merge(posts::router())
        .merge(votes::router())
        .merge(following::router())
        .merge(works::router())
        .merge(profiles::router())
        .merge(fandoms::router())
        .merge(wiki::router())
        .method_not_allowed_fallback(method_not_allowed)
}
