use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::{AppError, PipelineError},
    pipeline::{
        efforts::{compute_climbing_efforts, ClimbingEffortsReport},
        sync::{sync_activities, SyncOptions, SyncReport},
    },
    routes::require_bearer,
    state::AppState,
    strava::StravaApi,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/activities/sync", post(sync))
        .route("/api/climbing-efforts", post(climbing_efforts))
}

#[derive(Debug, Default, Deserialize)]
struct SyncRequest {
    user_id: Option<String>,
    after: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct ClimbingEffortsRequest {
    user_id: Option<String>,
    provider_id: Option<String>,
}

async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncReport>, AppError> {
    let access_token = require_bearer(&headers)?;
    let Json(payload) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let api = state.connector().connect(&access_token);
    let user_id = resolve_user(api.as_ref(), &[payload.user_id.as_deref()]).await?;

    let options = SyncOptions::from(state.config());
    let report = sync_activities(
        api.as_ref(),
        state.store(),
        state.sync_locks(),
        &user_id,
        payload.after,
        &options,
    )
    .await?;

    Ok(Json(report))
}

async fn climbing_efforts(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ClimbingEffortsRequest>, JsonRejection>,
) -> Result<Json<ClimbingEffortsReport>, AppError> {
    let access_token = require_bearer(&headers)?;
    let Json(payload) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let api = state.connector().connect(&access_token);
    let user_id = resolve_user(
        api.as_ref(),
        &[payload.user_id.as_deref(), payload.provider_id.as_deref()],
    )
    .await?;

    let report = compute_climbing_efforts(
        api.as_ref(),
        state.store(),
        &user_id,
        &user_id,
        state.config().effort_activity_count,
    )
    .await?;

    Ok(Json(report))
}

/// The credential's athlete owns the data; any id named in the body must be that athlete.
async fn resolve_user(api: &dyn StravaApi, claimed: &[Option<&str>]) -> Result<String, AppError> {
    let athlete = api.current_athlete().await.map_err(PipelineError::from)?;
    let user_id = athlete.user_key();

    let mismatch = claimed
        .iter()
        .flatten()
        .map(|id| id.trim())
        .find(|id| !id.is_empty() && *id != user_id);
    if let Some(other) = mismatch {
        return Err(AppError::Forbidden(format!(
            "athlete {} asked for data of {}",
            user_id, other
        )));
    }

    Ok(user_id)
}
