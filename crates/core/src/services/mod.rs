//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod comment;
pub mod fandom;
pub mod feed;
pub mod following;
pub mod post;
pub mod profile;
pub mod vote;
pub mod wiki;
pub mod work;

pub use account::{AccountService, NextStep, RegisterInput, Role, Session, SigninInput};
pub use comment::{AddCommentInput, CommentService};
pub use fandom::{CreateFandomInput, FandomService, FandomView};
pub use feed::{AuthorSuggestion, Feed, FeedService};
pub use following::{FollowOutcome, FollowingService};
pub use post::{CreatePostInput, PostDetail, PostService, PostView};
pub use profile::{EditProfileInput, ProfileService, ProfileView};
pub use vote::{VoteInput, VoteOutcome, VoteService};
pub use wiki::{WikiPageInput, WikiService};
pub use work::{RegisterWorkInput, WorkInput, WorkRegistration, WorkService, WorkView};
