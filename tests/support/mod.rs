#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vamscout::{
    error::{EnrichError, StravaError},
    pipeline::enrich::DetailEnricher,
    strava::{StravaApi, StravaConnector},
    types::{
        activity::{Activity, ActivityDetail, Athlete, EffortSegment, SegmentEffort},
        bounds::Tile,
        segment::{RawSegment, SegmentDetail, SegmentPage},
    },
};

type ExploreFn = dyn Fn(&Tile) -> Result<Vec<RawSegment>, StravaError> + Send + Sync;

pub struct StubApi {
    pub athlete: Result<Athlete, StravaError>,
    explore: Box<ExploreFn>,
    pub explore_calls: AtomicUsize,
    pub remote_activities: Mutex<Vec<Activity>>,
    pub listing_error: Mutex<Option<StravaError>>,
    pub afters: Mutex<Vec<Option<i64>>>,
    pub details: HashMap<u64, Result<ActivityDetail, StravaError>>,
    pub segments: HashMap<u64, Result<SegmentDetail, StravaError>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            athlete: Ok(Athlete {
                id: 1,
                username: None,
            }),
            explore: Box::new(|_| Ok(Vec::new())),
            explore_calls: AtomicUsize::new(0),
            remote_activities: Mutex::new(Vec::new()),
            listing_error: Mutex::new(None),
            afters: Mutex::new(Vec::new()),
            details: HashMap::new(),
            segments: HashMap::new(),
        }
    }

    pub fn with_athlete(mut self, id: u64) -> Self {
        self.athlete = Ok(Athlete { id, username: None });
        self
    }

    pub fn with_athlete_error(mut self, err: StravaError) -> Self {
        self.athlete = Err(err);
        self
    }

    pub fn with_explore(
        mut self,
        explore: impl Fn(&Tile) -> Result<Vec<RawSegment>, StravaError> + Send + Sync + 'static,
    ) -> Self {
        self.explore = Box::new(explore);
        self
    }

    pub fn with_activities(self, activities: Vec<Activity>) -> Self {
        *self.remote_activities.lock().expect("lock") = activities;
        self
    }

    pub fn with_detail(mut self, id: u64, detail: Result<ActivityDetail, StravaError>) -> Self {
        self.details.insert(id, detail);
        self
    }

    pub fn with_segment(mut self, id: u64, detail: Result<SegmentDetail, StravaError>) -> Self {
        self.segments.insert(id, detail);
        self
    }

    pub fn push_activity(&self, activity: Activity) {
        self.remote_activities.lock().expect("lock").push(activity);
    }

    pub fn fail_listing(&self, err: StravaError) {
        *self.listing_error.lock().expect("lock") = Some(err);
    }

    pub fn recorded_afters(&self) -> Vec<Option<i64>> {
        self.afters.lock().expect("lock").clone()
    }

    pub fn explore_call_count(&self) -> usize {
        self.explore_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StravaApi for StubApi {
    async fn current_athlete(&self) -> Result<Athlete, StravaError> {
        self.athlete.clone()
    }

    async fn explore_segments(&self, tile: &Tile) -> Result<Vec<RawSegment>, StravaError> {
        self.explore_calls.fetch_add(1, Ordering::SeqCst);
        (self.explore)(tile)
    }

    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, StravaError> {
        self.afters.lock().expect("lock").push(after);
        if let Some(err) = self.listing_error.lock().expect("lock").clone() {
            return Err(err);
        }

        let mut matching: Vec<Activity> = self
            .remote_activities
            .lock()
            .expect("lock")
            .iter()
            .filter(|a| after.map_or(true, |after| a.start_date.timestamp() > after))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.start_date.cmp(&a.start_date));

        Ok(matching
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect())
    }

    async fn get_activity(&self, id: u64) -> Result<ActivityDetail, StravaError> {
        self.details
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(StravaError::Status { status: 404, body: "Record Not Found".into() }))
    }

    async fn get_segment(&self, id: u64) -> Result<SegmentDetail, StravaError> {
        self.segments
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(StravaError::Status { status: 404, body: "Record Not Found".into() }))
    }
}

/// Hands out `api` for every token except those registered with `with_token`.
pub struct StubConnector {
    pub api: Arc<StubApi>,
    pub per_token: HashMap<String, Arc<StubApi>>,
    pub tokens: Mutex<Vec<String>>,
}

impl StubConnector {
    pub fn new(api: Arc<StubApi>) -> Self {
        Self {
            api,
            per_token: HashMap::new(),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(mut self, token: &str, api: Arc<StubApi>) -> Self {
        self.per_token.insert(token.to_string(), api);
        self
    }
}

impl StravaConnector for StubConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn StravaApi> {
        self.tokens.lock().expect("lock").push(access_token.to_string());
        self.per_token
            .get(access_token)
            .cloned()
            .unwrap_or_else(|| self.api.clone())
    }
}

#[derive(Default)]
pub struct StubEnricher {
    pub pages: HashMap<u64, SegmentPage>,
    pub failing: HashSet<u64>,
}

impl StubEnricher {
    pub fn with_page(mut self, id: u64, page: SegmentPage) -> Self {
        self.pages.insert(id, page);
        self
    }

    pub fn failing_on(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }
}

#[async_trait]
impl DetailEnricher for StubEnricher {
    async fn enrich(&self, segment: &RawSegment) -> Result<SegmentPage, EnrichError> {
        if self.failing.contains(&segment.id) {
            return Err(EnrichError::Status(503));
        }
        Ok(self.pages.get(&segment.id).cloned().unwrap_or_default())
    }
}

pub fn raw_segment(id: u64, climb_category: u8) -> RawSegment {
    RawSegment {
        id,
        name: format!("Segment {}", id),
        distance: 1000.0,
        avg_grade: 8.0,
        elev_difference: 80.0,
        climb_category,
    }
}

pub fn activity(id: u64, start_date: DateTime<Utc>) -> Activity {
    Activity {
        id,
        name: format!("Ride {}", id),
        distance: 42_000.0,
        elapsed_time: 5_400,
        elevation_gain: 650.0,
        start_date,
        activity_type: "Ride".to_string(),
    }
}

pub fn effort(
    id: u64,
    segment_id: u64,
    climb_category: u8,
    distance: f64,
    elevation: (f64, f64),
    elapsed_time: u64,
) -> SegmentEffort {
    SegmentEffort {
        id,
        elapsed_time,
        distance,
        segment: EffortSegment {
            id: segment_id,
            name: format!("Climb {}", segment_id),
            elevation_high: elevation.0,
            elevation_low: elevation.1,
            climb_category,
            average_grade: None,
        },
    }
}
