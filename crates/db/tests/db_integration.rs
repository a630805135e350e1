//! Database integration tests.
//!
//! These tests need a running `PostgreSQL` instance.
//! Run with: `cargo test -p fandoom-db --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `fandoom_test`)
//!   `TEST_DB_PASSWORD` (default: `fandoom_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use fandoom_common::AppError;
use fandoom_db::entities::{author, post, user, vote, vote::VoteType, work, work_follow};
use fandoom_db::repositories::{
    AuthorRepository, PostRepository, UserRepository, VoteRepository, WorkFollowRepository,
    WorkRepository,
};
use fandoom_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

async fn seed_user(db: &Arc<DatabaseConnection>, id: &str) -> user::Model {
    UserRepository::new(db.clone())
        .create(user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(id.to_string()),
            username_lower: Set(id.to_lowercase()),
            password_hash: Set("x".to_string()),
            token: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap()
}

async fn seed_post(db: &Arc<DatabaseConnection>, owner: &user::Model) -> post::Model {
    let author = AuthorRepository::new(db.clone())
        .create(author::ActiveModel {
            id: Set(format!("a-{}", owner.id)),
            user_id: Set(owner.id.clone()),
            bio: Set(String::new()),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();
    let work = WorkRepository::new(db.clone())
        .create(work::ActiveModel {
            id: Set(format!("w-{}", owner.id)),
            author_id: Set(author.id),
            title: Set("Work".to_string()),
            description: Set(String::new()),
            genre: Set(work::Genre::default()),
            audience: Set(work::Audience::default()),
            fandom_id: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();
    PostRepository::new(db.clone())
        .create(post::ActiveModel {
            id: Set(format!("p-{}", owner.id)),
            user_id: Set(owner.id.clone()),
            work_id: Set(work.id),
            title: Set("Title".to_string()),
            content: Set("Body".to_string()),
            image: Set(None),
            shared_post_id: Set(None),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap()
}

fn new_vote(id: &str, user_id: &str, post_id: &str, kind: VoteType) -> vote::ActiveModel {
    vote::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        post_id: Set(post_id.to_string()),
        vote_type: Set(kind.value()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_vote_is_conflict() {
    let test_db = TestDatabase::create_unique().await.expect("create db");
    let db = Arc::new(test_db.connection().clone());

    let alice = seed_user(&db, "alice").await;
    let post = seed_post(&db, &alice).await;
    let votes = VoteRepository::new(db.clone());

    votes
        .create(new_vote("v1", &alice.id, &post.id, VoteType::Up))
        .await
        .unwrap();
    let second = votes
        .create(new_vote("v2", &alice.id, &post.id, VoteType::Down))
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_scores_sum_vote_values() {
    let test_db = TestDatabase::create_unique().await.expect("create db");
    let db = Arc::new(test_db.connection().clone());

    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let carol = seed_user(&db, "carol").await;
    let post = seed_post(&db, &alice).await;
    let votes = VoteRepository::new(db.clone());

    votes
        .create(new_vote("v1", &alice.id, &post.id, VoteType::Up))
        .await
        .unwrap();
    votes
        .create(new_vote("v2", &bob.id, &post.id, VoteType::Up))
        .await
        .unwrap();
    votes
        .create(new_vote("v3", &carol.id, &post.id, VoteType::Down))
        .await
        .unwrap();

    let scores = votes.scores_for_posts(&[post.id.clone()]).await.unwrap();
    let ups = votes
        .count_by_post_and_type(&post.id, VoteType::Up)
        .await
        .unwrap();
    let downs = votes
        .count_by_post_and_type(&post.id, VoteType::Down)
        .await
        .unwrap();

    assert_eq!(scores.get(&post.id), Some(&1));
    assert_eq!(ups as i64 - downs as i64, 1);
    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_work_follow_is_conflict() {
    let test_db = TestDatabase::create_unique().await.expect("create db");
    let db = Arc::new(test_db.connection().clone());

    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let post = seed_post(&db, &alice).await;
    let follows = WorkFollowRepository::new(db.clone());

    let row = |id: &str| work_follow::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(bob.id.clone()),
        work_id: Set(post.work_id.clone()),
        created_at: Set(Utc::now().into()),
    };

    follows.create(row("wf1")).await.unwrap();
    assert!(matches!(
        follows.create(row("wf2")).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(follows.count_by_work(&post.work_id).await.unwrap(), 1);
    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_deleting_user_cascades_to_posts() {
    let test_db = TestDatabase::create_unique().await.expect("create db");
    let db = Arc::new(test_db.connection().clone());

    let alice = seed_user(&db, "alice").await;
    let post = seed_post(&db, &alice).await;

    fandoom_db::entities::User::delete_by_id(alice.id.clone())
        .exec(db.as_ref())
        .await
        .unwrap();

    let posts = PostRepository::new(db.clone());
    assert!(posts.find_by_id(&post.id).await.unwrap().is_none());
    test_db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.database.is_empty());
}
