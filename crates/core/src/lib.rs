//! Business rules for fandoom: registration, works, posts, votes and the social graph.

pub mod services;

pub use services::*;
