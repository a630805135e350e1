//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use fandoom_common::{Config, config::FeedConfig};
use fandoom_core::{
    AccountService, CommentService, FandomService, FeedService, FollowingService, PostService,
    ProfileService, VoteService, WikiService, WorkService,
};
use fandoom_db::repositories::{
    AuthorRepository, CommentRepository, FandomRepository, FollowRepository, PostRepository,
    UserProfileRepository, UserRepository, VoteRepository, WikiPageRepository,
    WorkFollowRepository, WorkRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub profile_service: ProfileService,
    pub work_service: WorkService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub vote_service: VoteService,
    pub following_service: FollowingService,
    pub feed_service: FeedService,
    pub fandom_service: FandomService,
    pub wiki_service: WikiService,
    pub feed_config: FeedConfig,
}

impl AppState {
    /// Wire every repository and service onto one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let profile_repo = UserProfileRepository::new(Arc::clone(&db));
        let author_repo = AuthorRepository::new(Arc::clone(&db));
        let work_repo = WorkRepository::new(Arc::clone(&db));
        let fandom_repo = FandomRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(Arc::clone(&db));
        let follow_repo = FollowRepository::new(Arc::clone(&db));
        let work_follow_repo = WorkFollowRepository::new(Arc::clone(&db));
        let wiki_repo = WikiPageRepository::new(db);

        let post_service = PostService::new(
            post_repo.clone(),
            work_repo.clone(),
            vote_repo.clone(),
            comment_repo.clone(),
        );

        Self {
            account_service: AccountService::new(user_repo.clone(), author_repo.clone()),
            profile_service: ProfileService::new(
                user_repo.clone(),
                profile_repo,
                author_repo.clone(),
                work_repo.clone(),
                follow_repo.clone(),
                post_service.clone(),
            ),
            work_service: WorkService::new(
                work_repo.clone(),
                author_repo.clone(),
                fandom_repo.clone(),
                work_follow_repo.clone(),
            ),
            comment_service: CommentService::new(comment_repo, post_repo.clone()),
            vote_service: VoteService::new(vote_repo, post_repo),
            following_service: FollowingService::new(
                follow_repo.clone(),
                work_follow_repo.clone(),
                author_repo.clone(),
                work_repo.clone(),
            ),
            feed_service: FeedService::new(
                post_service.clone(),
                user_repo,
                author_repo,
                work_repo.clone(),
                follow_repo,
                work_follow_repo,
                fandom_repo.clone(),
                config.feed.clone(),
            ),
            fandom_service: FandomService::new(fandom_repo, work_repo, post_service.clone()),
            wiki_service: WikiService::new(wiki_repo),
            post_service,
            feed_config: config.feed.clone(),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Unknown tokens pass through anonymously; handlers
/// that need a user reject through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.account_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring bearer token"),
        }
    }

    next.run(req).await
}
