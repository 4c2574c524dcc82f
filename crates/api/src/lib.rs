//! HTTP API layer for agora.
//!
//! - **Endpoints**: forum browsing, topic and post mutation, auth,
//!   profiles, and the admin surface
//! - **Extractors**: token authentication
//! - **Middleware**: application state and auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
