use std::collections::HashSet;

use futures::future::join_all;
use serde::Serialize;

use crate::{
    error::PipelineError,
    pipeline::{categorize::categorize, settle, Outcome},
    store::ActivityStore,
    strava::StravaApi,
    types::{
        activity::{Activity, SegmentEffort},
        climb::{ClimbEffort, ClimbTable},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct ClimbingEffortsReport {
    pub activities: Vec<Activity>,
    pub climbing_efforts: ClimbTable,
    /// Whether an earlier snapshot was overwritten.
    pub replaced: bool,
}

/// Scores the user's latest rides and stores the table as their climbing snapshot.
pub async fn compute_climbing_efforts(
    api: &dyn StravaApi,
    store: &dyn ActivityStore,
    user_id: &str,
    provider_id: &str,
    activity_count: u32,
) -> Result<ClimbingEffortsReport, PipelineError> {
    let activities = api.list_activities(None, 1, activity_count).await?;

    let lookups = activities.iter().map(|activity| async move {
        let outcome = Outcome::from_strava(api.get_activity(activity.id).await);
        if let Outcome::Isolated(reason) = &outcome {
            tracing::warn!("Error fetching segments for activity {}: {}", activity.id, reason);
        }
        outcome
    });
    let details = settle(join_all(lookups).await)?;

    let efforts = unique_efforts(details.into_iter().flat_map(|detail| detail.segment_efforts));
    let climbing_efforts = categorize(&climb_efforts(&efforts));

    let replaced = store
        .save_climb_snapshot(user_id, provider_id, &climbing_efforts)
        .await?;

    tracing::info!(
        "Categorized {} segment efforts from {} activities for user {}",
        efforts.len(),
        activities.len(),
        user_id
    );

    Ok(ClimbingEffortsReport {
        activities,
        climbing_efforts,
        replaced,
    })
}

pub fn unique_efforts(efforts: impl IntoIterator<Item = SegmentEffort>) -> Vec<SegmentEffort> {
    let mut seen = HashSet::new();
    efforts
        .into_iter()
        .filter(|effort| seen.insert(effort.id))
        .collect()
}

/// Categorized segments only.
pub fn climb_efforts(efforts: &[SegmentEffort]) -> Vec<ClimbEffort> {
    efforts
        .iter()
        .filter(|effort| effort.segment.climb_category > 0)
        .map(|effort| ClimbEffort {
            distance: effort.distance,
            elapsed_time: effort.elapsed_time,
            elevation_high: effort.segment.elevation_high,
            elevation_low: effort.segment.elevation_low,
            average_grade: effort.segment.average_grade,
        })
        .collect()
}
