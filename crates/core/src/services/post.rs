//! Post service.

use std::collections::HashMap;

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::{comment, post, vote::VoteType},
    repositories::{CommentRepository, PostRepository, VoteRepository, WorkRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub content: String,

    /// Image URL
    #[validate(length(max = 1024))]
    pub image: Option<String>,

    pub shared_post_id: Option<String>,

    pub work_id: Option<String>,
}

/// A post with its derived score.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: post::Model,
    pub score: i64,
    /// The viewer's vote, when a viewer is known.
    pub my_vote: Option<VoteType>,
}

/// Everything shown on a post's page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostView,
    pub shared_post: Option<PostView>,
    /// Oldest first.
    pub comments: Vec<comment::Model>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    work_repo: WorkRepository,
    vote_repo: VoteRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

/// Treat blank optional fields as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        work_repo: WorkRepository,
        vote_repo: VoteRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            post_repo,
            work_repo,
            vote_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a post under a work.
    ///
    /// Checks run in a fixed order so the first problem is the one reported:
    /// body, title, work selected, work exists, shared post exists.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let content = input.content.trim().to_string();
        let image = non_blank(input.image);
        let shared_post_id = non_blank(input.shared_post_id);

        if content.is_empty() && image.is_none() && shared_post_id.is_none() {
            return Err(AppError::Validation(
                "A post needs text, an image or a shared post".to_string(),
            ));
        }

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("A post needs a title".to_string()));
        }

        let Some(work_id) = non_blank(input.work_id) else {
            return Err(AppError::Validation(
                "Select the work this post belongs to".to_string(),
            ));
        };
        let work = self.work_repo.get_by_id(&work_id).await?;

        if let Some(shared_id) = &shared_post_id {
            self.post_repo.get_by_id(shared_id).await?;
        }

        let post = self
            .post_repo
            .create(post::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                work_id: Set(work.id),
                title: Set(title),
                content: Set(content),
                image: Set(image),
                shared_post_id: Set(shared_post_id),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        tracing::debug!(post_id = %post.id, work_id = %post.work_id, "Created post");
        Ok(post)
    }

    /// Load a post with its score, shared post and comments.
    pub async fn get_detail(&self, post_id: &str, viewer_id: Option<&str>) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let shared = match &post.shared_post_id {
            Some(id) => self.post_repo.find_by_id(id).await?,
            None => None,
        };

        let mut posts = vec![post];
        posts.extend(shared);
        let mut views = self.decorate(posts, viewer_id).await?.into_iter();

        let post = views
            .next()
            .ok_or_else(|| AppError::Internal("decorated post went missing".to_string()))?;
        let shared_post = views.next();

        let comments = self.comment_repo.find_by_post(post_id).await?;

        Ok(PostDetail {
            post,
            shared_post,
            comments,
        })
    }

    /// All posts, newest first.
    pub async fn recent(
        &self,
        limit: u64,
        until_id: Option<&str>,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<PostView>> {
        let posts = self.post_repo.find_recent(limit, until_id).await?;
        self.decorate(posts, viewer_id).await
    }

    /// A user's posts, newest first.
    pub async fn by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<PostView>> {
        let posts = self.post_repo.find_by_user(user_id, limit, until_id).await?;
        self.decorate(posts, viewer_id).await
    }

    /// Posts filed under any of `work_ids`, newest first.
    pub async fn by_works(
        &self,
        work_ids: &[String],
        limit: u64,
        until_id: Option<&str>,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<PostView>> {
        let posts = self
            .post_repo
            .find_by_work_ids(work_ids, limit, until_id)
            .await?;
        self.decorate(posts, viewer_id).await
    }

    /// Attach scores and the viewer's votes, keeping the input order.
    pub async fn decorate(
        &self,
        posts: Vec<post::Model>,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<PostView>> {
        let ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let scores = self.vote_repo.scores_for_posts(&ids).await?;

        let my_votes: HashMap<String, VoteType> = match viewer_id {
            Some(user_id) => self
                .vote_repo
                .find_by_user_and_posts(user_id, &ids)
                .await?
                .into_iter()
                .filter_map(|v| v.kind().map(|kind| (v.post_id, kind)))
                .collect(),
            None => HashMap::new(),
        };

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                score: scores.get(&post.id).copied().unwrap_or(0),
                my_vote: my_votes.get(&post.id).copied(),
                post,
            })
            .collect())
    }
}
