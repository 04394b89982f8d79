use std::collections::HashSet;

use futures::{future::join_all, stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PipelineError, StravaError},
    pipeline::{categorize::categorize, enrich::DetailEnricher, settle, tiler, Outcome},
    strava::StravaApi,
    types::{
        bounds::{BoundingBox, Tile},
        climb::{ClimbEffort, ClimbTable},
        segment::{EnrichedSegment, RawSegment, SegmentRow},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub segments: Vec<SegmentRow>,
    pub climbs: ClimbTable,
}

/// Full discovery: tile, explore, dedupe, enrich, categorize.
pub async fn discover_segments(
    api: &dyn StravaApi,
    enricher: &dyn DetailEnricher,
    bbox: &BoundingBox,
    concurrency: usize,
) -> Result<DiscoveryReport, PipelineError> {
    let targets = tiler::query_targets(bbox);
    tracing::info!(
        "Exploring {:.2} deg² with {} queries",
        bbox.area(),
        targets.len()
    );

    let found = fetch_segments(api, &targets).await?;
    let unique = dedupe(found);
    let enriched = enrich_segments(enricher, unique, concurrency).await;

    let climbing: Vec<EnrichedSegment> = enriched
        .into_iter()
        .filter(|enriched| enriched.segment.climb_category > 0)
        .collect();

    let efforts: Vec<ClimbEffort> = climbing.iter().map(effort_for).collect();
    let climbs = categorize(&efforts);

    let mut segments: Vec<SegmentRow> = climbing.iter().map(SegmentRow::from).collect();
    segments.sort_by(|a, b| b.k_vam.total_cmp(&a.k_vam).then(a.id.cmp(&b.id)));

    tracing::info!("Discovery produced {} climbing segments", segments.len());
    Ok(DiscoveryReport { segments, climbs })
}

/// One explore call per tile. Non-auth failures yield nothing for that tile.
pub async fn fetch_segments(
    api: &dyn StravaApi,
    tiles: &[Tile],
) -> Result<Vec<RawSegment>, StravaError> {
    let requests = tiles.iter().map(|tile| async move {
        let outcome = Outcome::from_strava(api.explore_segments(tile).await);
        if let Outcome::Isolated(reason) = &outcome {
            tracing::warn!("Error fetching segments for area {}: {}", tile.to_query(), reason);
        }
        outcome
    });

    let outcomes = join_all(requests).await;
    if let Some(Outcome::Fatal(err)) = outcomes.iter().find(|outcome| outcome.is_fatal()) {
        tracing::warn!("Aborting discovery: {}", err);
    }
    let per_tile = settle(outcomes)?;
    Ok(per_tile.into_iter().flatten().collect())
}

/// Unique by id, first occurrence wins.
pub fn dedupe(segments: Vec<RawSegment>) -> Vec<RawSegment> {
    let mut seen = HashSet::new();
    segments
        .into_iter()
        .filter(|segment| seen.insert(segment.id))
        .collect()
}

/// Enriches every segment; a failed page leaves that segment unenriched.
pub async fn enrich_segments(
    enricher: &dyn DetailEnricher,
    segments: Vec<RawSegment>,
    concurrency: usize,
) -> Vec<EnrichedSegment> {
    stream::iter(segments)
        .map(|segment| async move {
            let page = match enricher.enrich(&segment).await {
                Ok(page) => Some(page),
                Err(err) => {
                    tracing::warn!("Error fetching or parsing segment {}: {}", segment.id, err);
                    None
                }
            };
            EnrichedSegment { segment, page }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Leader's ascent of the segment, falling back to API elevation when the page had none.
pub fn effort_for(enriched: &EnrichedSegment) -> ClimbEffort {
    let segment = &enriched.segment;
    let (elevation_high, elevation_low) = match (enriched.elevation_high(), enriched.elevation_low()) {
        (Some(high), Some(low)) => (high, low),
        _ => (enriched.elevation_gain(), 0.0),
    };
    let average_grade = Some(segment.avg_grade).filter(|grade| *grade != 0.0);

    ClimbEffort {
        distance: segment.distance,
        elapsed_time: enriched.best_time().unwrap_or(0),
        elevation_high,
        elevation_low,
        average_grade,
    }
}
