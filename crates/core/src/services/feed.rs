//! Feed service: the home page aggregation.

use std::collections::HashMap;

use fandoom_common::{AppResult, config::FeedConfig};
use fandoom_db::{
    entities::{author, fandom, work},
    repositories::{
        AuthorRepository, FandomRepository, FollowRepository, UserRepository,
        WorkFollowRepository, WorkRepository,
    },
};

use super::post::{PostService, PostView};

/// An author the viewer might follow.
#[derive(Debug, Clone)]
pub struct AuthorSuggestion {
    pub author: author::Model,
    pub username: String,
}

/// The home feed of one viewer.
#[derive(Debug, Clone)]
pub struct Feed {
    pub posts: Vec<PostView>,
    pub authors_to_follow: Vec<AuthorSuggestion>,
    pub authors_to_follow_total: u64,
    pub works_to_follow: Vec<work::Model>,
    pub works_to_follow_total: u64,
    pub followed_works: Vec<work::Model>,
    pub fandoms: Vec<fandom::Model>,
}

/// Feed service for business logic.
#[derive(Clone)]
pub struct FeedService {
    post_service: PostService,
    user_repo: UserRepository,
    author_repo: AuthorRepository,
    work_repo: WorkRepository,
    follow_repo: FollowRepository,
    work_follow_repo: WorkFollowRepository,
    fandom_repo: FandomRepository,
    config: FeedConfig,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_service: PostService,
        user_repo: UserRepository,
        author_repo: AuthorRepository,
        work_repo: WorkRepository,
        follow_repo: FollowRepository,
        work_follow_repo: WorkFollowRepository,
        fandom_repo: FandomRepository,
        config: FeedConfig,
    ) -> Self {
        Self {
            post_service,
            user_repo,
            author_repo,
            work_repo,
            follow_repo,
            work_follow_repo,
            fandom_repo,
            config,
        }
    }

    /// Assemble the home feed for `viewer_id`.
    pub async fn home(
        &self,
        viewer_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Feed> {
        let posts = self
            .post_service
            .recent(limit, until_id, Some(viewer_id))
            .await?;

        let (authors_to_follow, authors_to_follow_total) =
            self.author_suggestions(viewer_id).await?;

        let followed_work_ids = self.work_follow_repo.find_work_ids_by_user(viewer_id).await?;
        let own_author = self.author_repo.find_by_user_id(viewer_id).await?;
        let own_author_id = own_author.as_ref().map(|a| a.id.as_str());

        let works_to_follow = self
            .work_repo
            .find_excluding(&followed_work_ids, own_author_id, self.config.suggestion_limit)
            .await?;
        let works_to_follow_total = self
            .work_repo
            .count_excluding(&followed_work_ids, own_author_id)
            .await?;

        let followed_works = self.work_repo.find_by_ids(&followed_work_ids).await?;
        let fandoms = self.fandom_repo.find_all().await?;

        tracing::debug!(
            viewer_id = %viewer_id,
            posts = posts.len(),
            authors_to_follow_total,
            works_to_follow_total,
            "Assembled feed"
        );

        Ok(Feed {
            posts,
            authors_to_follow,
            authors_to_follow_total,
            works_to_follow,
            works_to_follow_total,
            followed_works,
            fandoms,
        })
    }

    /// Authors the viewer does not follow yet, excluding the viewer.
    async fn author_suggestions(&self, viewer_id: &str) -> AppResult<(Vec<AuthorSuggestion>, u64)> {
        let mut excluded = self.follow_repo.find_followed_ids(viewer_id).await?;
        excluded.push(viewer_id.to_string());

        let authors = self
            .author_repo
            .find_excluding_users(&excluded, self.config.suggestion_limit)
            .await?;
        let total = self.author_repo.count_excluding_users(&excluded).await?;

        let user_ids: Vec<String> = authors.iter().map(|a| a.user_id.clone()).collect();
        let usernames: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let suggestions = authors
            .into_iter()
            .filter_map(|author| {
                let username = usernames.get(&author.user_id)?.clone();
                Some(AuthorSuggestion { author, username })
            })
            .collect();

        Ok((suggestions, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fandoom_db::entities::{post, user};
    use fandoom_db::repositories::{CommentRepository, PostRepository, VoteRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> FeedService {
        let db = Arc::new(db);
        let post_service = PostService::new(
            PostRepository::new(db.clone()),
            WorkRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
        );
        FeedService::new(
            post_service,
            UserRepository::new(db.clone()),
            AuthorRepository::new(db.clone()),
            WorkRepository::new(db.clone()),
            FollowRepository::new(db.clone()),
            WorkFollowRepository::new(db.clone()),
            FandomRepository::new(db),
            FeedConfig::default(),
        )
    }

    fn create_test_author(id: &str, user_id: &str) -> author::Model {
        author::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            bio: String::new(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: "hash".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_work(id: &str) -> work::Model {
        work::Model {
            id: id.to_string(),
            author_id: "a2".to_string(),
            title: format!("Work {id}"),
            description: String::new(),
            genre: work::Genre::default(),
            audience: work::Audience::default(),
            fandom_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_home_feed_for_new_reader() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // posts (none yet, so no score lookups follow)
            .append_query_results([Vec::<post::Model>::new()])
            // followed users
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            // author suggestions, total and usernames
            .append_query_results([[create_test_author("a2", "u2")]])
            .append_query_results([[maplit::btreemap! { "num_items" => Value::BigInt(Some(8)) }]])
            .append_query_results([[create_test_user("u2", "writer")]])
            // followed works, own author
            .append_query_results([[maplit::btreemap! { "work_id" => Value::from("w1") }]])
            .append_query_results([Vec::<author::Model>::new()])
            // work suggestions and total
            .append_query_results([[create_test_work("w2")]])
            .append_query_results([[maplit::btreemap! { "num_items" => Value::BigInt(Some(1)) }]])
            // followed works, fandoms
            .append_query_results([[create_test_work("w1")]])
            .append_query_results([Vec::<fandom::Model>::new()])
            .into_connection();

        let feed = service(db).home("u1", 50, None).await.unwrap();

        assert!(feed.posts.is_empty());
        assert_eq!(feed.authors_to_follow.len(), 1);
        assert_eq!(feed.authors_to_follow[0].username, "writer");
        assert_eq!(feed.authors_to_follow_total, 8);
        assert_eq!(feed.works_to_follow[0].id, "w2");
        assert_eq!(feed.works_to_follow_total, 1);
        assert_eq!(feed.followed_works[0].id, "w1");
        assert!(feed.fandoms.is_empty());
    }
}
