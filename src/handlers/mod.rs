pub mod admin;
pub mod auth;
pub mod booking;
pub mod health;

use axum::http::HeaderMap;

/// Client key for rate limiting: first X-Forwarded-For entry when present
/// (the service is expected to sit behind a proxy), otherwise "local".
pub(crate) fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "local".to_string())
}
