//! HTTP API layer for fandoom.
//!
//! - **Endpoints**: accounts, feed, posts, votes, follows, works, profiles,
//!   fandoms and the wiki
//! - **Extractors**: authenticated user, JSON bodies, pagination
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
