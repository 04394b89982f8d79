use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{AppError, PipelineError},
    pipeline::discover::{discover_segments, DiscoveryReport},
    routes::require_bearer,
    state::AppState,
    types::{bounds::BoundingBox, segment::SegmentDetail},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/segments/discover", post(discover))
        .route("/api/segments/:segment_id", get(segment_detail))
}

#[derive(Debug, Deserialize)]
struct DiscoverRequest {
    coords: Vec<f64>,
}

async fn discover(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DiscoverRequest>, JsonRejection>,
) -> Result<Json<DiscoveryReport>, AppError> {
    let access_token = require_bearer(&headers)?;

    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("Rejected discover body: {}", rejection);
        invalid_coordinates()
    })?;
    let coords: [f64; 4] = payload
        .coords
        .as_slice()
        .try_into()
        .map_err(|_| invalid_coordinates())?;
    let bbox = BoundingBox::from_coords(coords)?;

    let api = state.connector().connect(&access_token);
    let report = discover_segments(
        api.as_ref(),
        state.enricher(),
        &bbox,
        state.config().enrich_concurrency,
    )
    .await?;

    Ok(Json(report))
}

async fn segment_detail(
    State(state): State<AppState>,
    Path(segment_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<SegmentDetail>, AppError> {
    let access_token = require_bearer(&headers)?;
    let api = state.connector().connect(&access_token);
    let detail = api
        .get_segment(segment_id)
        .await
        .map_err(PipelineError::from)?;
    Ok(Json(detail))
}

fn invalid_coordinates() -> AppError {
    AppError::BadRequest("Invalid coordinates".to_string())
}
