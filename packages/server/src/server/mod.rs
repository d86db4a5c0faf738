// HTTP server setup (Axum)
pub mod app;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;

pub use app::*;
pub use error::{ApiError, ApiResult};
