//! Work service: the catalog of works owned by authors.

use chrono::Utc;
use fandoom_common::{AppError, AppResult, IdGenerator};
use fandoom_db::{
    entities::{
        author,
        work::{self, Audience, Genre},
    },
    repositories::{AuthorRepository, FandomRepository, WorkFollowRepository, WorkRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for the first work an author registers after signup.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWorkInput {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub work_title: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub work_description: String,

    /// The author accepted the content integrity notice.
    #[serde(default)]
    pub accept_integrity: bool,
}

/// Input for adding or editing a work.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,

    #[serde(default)]
    pub genre: Genre,

    #[serde(default)]
    pub audience: Audience,

    pub fandom_id: Option<String>,
}

/// State of the work registration step.
#[derive(Debug, Clone)]
pub struct WorkRegistration {
    pub author: author::Model,
    pub works: Vec<work::Model>,
}

/// A work with its owner and follower count.
#[derive(Debug, Clone)]
pub struct WorkView {
    pub work: work::Model,
    pub author: author::Model,
    pub followers_count: u64,
    pub is_following: bool,
}

/// Work service for business logic.
#[derive(Clone)]
pub struct WorkService {
    work_repo: WorkRepository,
    author_repo: AuthorRepository,
    fandom_repo: FandomRepository,
    work_follow_repo: WorkFollowRepository,
    id_gen: IdGenerator,
}

impl WorkService {
    /// Create a new work service.
    #[must_use]
    pub const fn new(
        work_repo: WorkRepository,
        author_repo: AuthorRepository,
        fandom_repo: FandomRepository,
        work_follow_repo: WorkFollowRepository,
    ) -> Self {
        Self {
            work_repo,
            author_repo,
            fandom_repo,
            work_follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// The caller's author record and works, for the registration step.
    pub async fn registration(&self, user_id: &str) -> AppResult<WorkRegistration> {
        let author = self.require_author(user_id).await?;
        let works = self.work_repo.find_by_author(&author.id).await?;
        Ok(WorkRegistration { author, works })
    }

    /// Register an author's first work and describe it in the author bio.
    pub async fn register_work(
        &self,
        user_id: &str,
        input: RegisterWorkInput,
    ) -> AppResult<work::Model> {
        input.validate()?;
        let author = self.require_author(user_id).await?;

        let title = input.work_title.trim();
        let description = input.work_description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(AppError::Validation(
                "Work title and description are required".to_string(),
            ));
        }
        if !input.accept_integrity {
            return Err(AppError::Validation(
                "The integrity notice must be accepted".to_string(),
            ));
        }

        let txn = self.work_repo.begin().await?;

        let work = WorkRepository::create_in(
            &txn,
            work::ActiveModel {
                id: Set(self.id_gen.generate()),
                author_id: Set(author.id.clone()),
                title: Set(title.to_string()),
                description: Set(description.to_string()),
                genre: Set(Genre::default()),
                audience: Set(Audience::default()),
                fandom_id: Set(None),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            },
        )
        .await?;

        let mut active: author::ActiveModel = author.into();
        active.bio = Set(format!("Obra: {title}\n\nDescripción: {description}"));
        AuthorRepository::update_in(&txn, active).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(work_id = %work.id, "Registered first work");
        Ok(work)
    }

    /// Add a work to the caller's catalog.
    pub async fn add(&self, user_id: &str, input: WorkInput) -> AppResult<work::Model> {
        input.validate()?;
        let author = self.require_author(user_id).await?;
        let (title, fandom_id) = self.check_input(&input).await?;

        let work = self
            .work_repo
            .create(work::ActiveModel {
                id: Set(self.id_gen.generate()),
                author_id: Set(author.id),
                title: Set(title),
                description: Set(input.description.trim().to_string()),
                genre: Set(input.genre),
                audience: Set(input.audience),
                fandom_id: Set(fandom_id),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        tracing::debug!(work_id = %work.id, "Added work");
        Ok(work)
    }

    /// Edit a work the caller owns.
    pub async fn edit(&self, user_id: &str, work_id: &str, input: WorkInput) -> AppResult<work::Model> {
        input.validate()?;

        let work = self.work_repo.get_by_id(work_id).await?;
        let owner = self.author_repo.find_by_user_id(user_id).await?;
        if owner.is_none_or(|a| a.id != work.author_id) {
            return Err(AppError::Forbidden(
                "Only the work's author can edit it".to_string(),
            ));
        }

        let (title, fandom_id) = self.check_input(&input).await?;

        let mut active: work::ActiveModel = work.into();
        active.title = Set(title);
        active.description = Set(input.description.trim().to_string());
        active.genre = Set(input.genre);
        active.audience = Set(input.audience);
        active.fandom_id = Set(fandom_id);
        active.updated_at = Set(Some(Utc::now().into()));

        self.work_repo.update(active).await
    }

    /// Load a work with its author and follower count.
    pub async fn get(&self, work_id: &str, viewer_id: Option<&str>) -> AppResult<WorkView> {
        let work = self.work_repo.get_by_id(work_id).await?;
        let author = self.author_repo.get_by_id(&work.author_id).await?;
        let followers_count = self.work_follow_repo.count_by_work(&work.id).await?;

        let is_following = match viewer_id {
            Some(user_id) => self
                .work_follow_repo
                .find_by_pair(user_id, &work.id)
                .await?
                .is_some(),
            None => false,
        };

        Ok(WorkView {
            work,
            author,
            followers_count,
            is_following,
        })
    }

    async fn require_author(&self, user_id: &str) -> AppResult<author::Model> {
        self.author_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Only authors can manage works".to_string()))
    }

    /// Trimmed title and a fandom ID known to exist.
    async fn check_input(&self, input: &WorkInput) -> AppResult<(String, Option<String>)> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("A work needs a title".to_string()));
        }

        let fandom_id = match input.fandom_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(self.fandom_repo.get_by_id(id).await?.id),
            _ => None,
        };

        Ok((title, fandom_id))
    }
}
