use axum::http::StatusCode;

use crate::error::ApiError;

pub mod admin;
pub mod bootstrap;
pub mod categories;
pub mod health;
pub mod stats;
pub mod transactions;

/// Preflight requests are answered immediately; the CORS layer attaches the
/// permissive headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Fallback for method routers: anything but the supported methods gets a
/// JSON 405 before any token is looked at.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
