pub mod activities;
pub mod health;
pub mod segments;

use axum::http::HeaderMap;

use crate::error::AppError;

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?;
    let raw = value.to_str().ok()?;
    raw.strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub(crate) fn require_bearer(headers: &HeaderMap) -> Result<String, AppError> {
    bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Missing Strava Bearer token".to_string()))
}
