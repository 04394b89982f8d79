use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    config::Config,
    error::{PipelineError, StravaError},
    store::ActivityStore,
    strava::StravaApi,
    types::activity::Activity,
};

/// One writer per user for the read-then-write of the cursor.
/// Entries live only while a sync for that user holds or waits on the lock.
#[derive(Default)]
pub struct SyncLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SyncLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str) -> SyncGuard<'_> {
        let lock = self.locks.entry(user_id.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        SyncGuard {
            locks: self,
            user_id: user_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Users with a sync running or queued.
    pub fn active(&self) -> usize {
        self.locks.len()
    }

    fn release(&self, user_id: &str) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Holds a user's sync lock; drops the map entry once nobody else is waiting.
pub struct SyncGuard<'a> {
    locks: &'a SyncLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(&self.user_id);
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub lookback_days: i64,
    pub per_page: u32,
    pub max_pages: u32,
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            lookback_days: config.sync_lookback_days,
            per_page: config.activities_per_page,
            max_pages: config.max_sync_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Newest first.
    pub activities: Vec<Activity>,
    pub fetched: usize,
    pub cursor: Option<DateTime<Utc>>,
}

pub async fn sync_activities(
    api: &dyn StravaApi,
    store: &dyn ActivityStore,
    locks: &SyncLocks,
    user_id: &str,
    cursor: Option<DateTime<Utc>>,
    options: &SyncOptions,
) -> Result<SyncReport, PipelineError> {
    let _guard = locks.acquire(user_id).await;

    let persisted_cursor = store.last_activity_date(user_id).await?;
    let after = cursor
        .or(persisted_cursor)
        .unwrap_or_else(|| lookback_start(options.lookback_days));

    let fresh = fetch_since(api, after.timestamp(), options).await?;
    let persisted = store.activities(user_id).await?;
    let activities = merge_activities(persisted, fresh.clone());

    let mut next_cursor = persisted_cursor;
    if let Some(newest) = fresh.iter().map(|activity| activity.start_date).max() {
        store.upsert_activities(user_id, &fresh).await?;
        let advanced = next_cursor.map_or(newest, |previous| previous.max(newest));
        store.set_last_activity_date(user_id, advanced).await?;
        next_cursor = Some(advanced);
    }

    tracing::info!(
        "Synced {} new activities for user {} ({} total)",
        fresh.len(),
        user_id,
        activities.len()
    );

    Ok(SyncReport {
        activities,
        fetched: fresh.len(),
        cursor: next_cursor,
    })
}

fn lookback_start(days: i64) -> DateTime<Utc> {
    let now = Utc::now();
    Duration::try_days(days.max(0))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Pages through the listing until a short page or the page cap.
async fn fetch_since(
    api: &dyn StravaApi,
    after: i64,
    options: &SyncOptions,
) -> Result<Vec<Activity>, StravaError> {
    let mut activities = Vec::new();
    for page in 1..=options.max_pages {
        let batch = api.list_activities(Some(after), page, options.per_page).await?;
        let short_page = (batch.len() as u32) < options.per_page;
        activities.extend(batch);
        if short_page {
            break;
        }
    }
    Ok(activities)
}

/// Unique by id with `fresh` overriding `persisted`, newest start first.
pub fn merge_activities(persisted: Vec<Activity>, fresh: Vec<Activity>) -> Vec<Activity> {
    let mut by_id: HashMap<u64, Activity> = HashMap::new();
    for activity in persisted.into_iter().chain(fresh) {
        by_id.insert(activity.id, activity);
    }

    let mut merged: Vec<Activity> = by_id.into_values().collect();
    merged.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
    merged
}
