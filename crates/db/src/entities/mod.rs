//! Database entities.

#![allow(missing_docs)]

pub mod author;
pub mod comment;
pub mod fandom;
pub mod follow;
pub mod post;
pub mod user;
pub mod user_profile;
pub mod vote;
pub mod wiki_page;
pub mod work;
pub mod work_follow;

pub use author::Entity as Author;
pub use comment::Entity as Comment;
pub use fandom::Entity as Fandom;
pub use follow::Entity as Follow;
pub use post::Entity as Post;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
pub use vote::Entity as Vote;
pub use wiki_page::Entity as WikiPage;
pub use work::Entity as Work;
pub use work_follow::Entity as WorkFollow;
