use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const SESSION_COOKIE: &str = "session-token";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("Coordinates must be finite numbers")]
    NonFinite,
    #[error("Coordinates out of range: lat must be within [-90, 90], lon within [-180, 180]")]
    OutOfRange,
    #[error("North-east corner must lie strictly north and east of the south-west corner")]
    Inverted,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StravaError {
    #[error("Authorization Error: {0}")]
    Unauthorized(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Request timed out")]
    Timeout,
    #[error("Strava request failed ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("Strava transport error: {0}")]
    Transport(String),
    #[error("Invalid Strava response: {0}")]
    Decode(String),
}

impl StravaError {
    /// Only an invalid credential aborts a whole fan-out; everything else is per item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StravaError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for StravaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StravaError::Timeout
        } else if err.is_decode() {
            StravaError::Decode(err.to_string())
        } else {
            StravaError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("Segment page request failed: {0}")]
    Fetch(String),
    #[error("Segment page returned status {0}")]
    Status(u16),
    #[error("Segment page request timed out")]
    Timeout,
}

impl From<reqwest::Error> for EnrichError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnrichError::Timeout
        } else {
            EnrichError::Fetch(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VamError {
    #[error("Time must be greater than zero (got {0} minutes)")]
    NonPositiveTime(f64),
    #[error("Elevation gain must not be negative (got {0} m)")]
    NegativeElevationGain(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to serialize record: {0}")]
    Serialize(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Authorization Error: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Upstream(StravaError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StravaError> for PipelineError {
    fn from(err: StravaError) -> Self {
        match err {
            StravaError::Unauthorized(message) => PipelineError::Unauthorized(message),
            other => PipelineError::Upstream(other),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Pipeline(PipelineError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Unauthorized(message) => AppError::Unauthorized(message),
            other => AppError::Pipeline(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Bounds(_) | AppError::BadRequest(_) => {
                let body = Json(json!({ "error": self.to_string() }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Unauthorized(reason) => {
                tracing::warn!("Invalidating session after authorization failure: {}", reason);
                let clear_cookie = format!(
                    "{}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0",
                    SESSION_COOKIE
                );
                let body = Json(json!({
                    "error": "Authorization expired, please sign in again",
                    "redirect": "/"
                }));
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::SET_COOKIE, clear_cookie)],
                    body,
                )
                    .into_response()
            }
            AppError::Forbidden(reason) => {
                tracing::warn!("Rejected cross-user request: {}", reason);
                let body = Json(json!({ "error": "Not allowed for this account" }));
                (StatusCode::FORBIDDEN, body).into_response()
            }
            AppError::Pipeline(_) | AppError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                let body = Json(json!({ "error": "Failed to fetch data" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
