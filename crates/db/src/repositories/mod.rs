//! Repositories: one per aggregate, each wrapping a shared connection.

mod author;
mod comment;
mod fandom;
mod follow;
mod post;
mod user;
mod user_profile;
mod vote;
mod wiki_page;
mod work;
mod work_follow;

pub use author::AuthorRepository;
pub use comment::CommentRepository;
pub use fandom::FandomRepository;
pub use follow::FollowRepository;
pub use post::PostRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
pub use vote::{PostScore, VoteRepository};
pub use wiki_page::WikiPageRepository;
pub use work::WorkRepository;
pub use work_follow::WorkFollowRepository;

use fandoom_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map an insert failure, surfacing unique-key collisions as [`AppError::Conflict`].
///
/// Services rely on this to tell a lost insert race apart from a real failure.
pub(crate) fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_stay_database_errors() {
        let err = map_insert_error(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(msg) if msg.contains("connection reset")));
    }
}
