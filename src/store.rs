use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::StoreError;
use crate::types::{activity::Activity, climb::ClimbTable};

/// Persistence collaborator for per-user sync state.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn activities(&self, user_id: &str) -> Result<Vec<Activity>, StoreError>;

    /// Inserts or overwrites by activity id.
    async fn upsert_activities(&self, user_id: &str, activities: &[Activity]) -> Result<(), StoreError>;

    async fn last_activity_date(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn set_last_activity_date(&self, user_id: &str, date: DateTime<Utc>) -> Result<(), StoreError>;

    /// Replaces the user's climbing snapshot. Returns true when one already existed.
    async fn save_climb_snapshot(
        &self,
        user_id: &str,
        provider_id: &str,
        snapshot: &ClimbTable,
    ) -> Result<bool, StoreError>;

    async fn climb_snapshot(&self, provider_id: &str) -> Result<Option<ClimbSnapshot>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct ClimbSnapshot {
    pub user_id: String,
    pub provider_id: String,
    /// Serialized [`ClimbTable`].
    pub effort_data: String,
    pub updated_at: DateTime<Utc>,
}

impl ClimbSnapshot {
    pub fn table(&self) -> Result<ClimbTable, StoreError> {
        serde_json::from_str(&self.effort_data).map_err(|err| StoreError::Serialize(err.to_string()))
    }
}

#[derive(Default)]
struct UserRecord {
    activities: HashMap<u64, Activity>,
    last_activity_date: Option<DateTime<Utc>>,
}

/// In-process store, keyed by user id.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
    snapshots: DashMap<String, ClimbSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn activities(&self, user_id: &str) -> Result<Vec<Activity>, StoreError> {
        Ok(self
            .users
            .get(user_id)
            .map(|record| record.activities.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_activities(&self, user_id: &str, activities: &[Activity]) -> Result<(), StoreError> {
        let mut record = self.users.entry(user_id.to_string()).or_default();
        for activity in activities {
            record.activities.insert(activity.id, activity.clone());
        }
        Ok(())
    }

    async fn last_activity_date(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .users
            .get(user_id)
            .and_then(|record| record.last_activity_date))
    }

    async fn set_last_activity_date(&self, user_id: &str, date: DateTime<Utc>) -> Result<(), StoreError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .last_activity_date = Some(date);
        Ok(())
    }

    async fn save_climb_snapshot(
        &self,
        user_id: &str,
        provider_id: &str,
        snapshot: &ClimbTable,
    ) -> Result<bool, StoreError> {
        let effort_data =
            serde_json::to_string(snapshot).map_err(|err| StoreError::Serialize(err.to_string()))?;
        let previous = self.snapshots.insert(
            provider_id.to_string(),
            ClimbSnapshot {
                user_id: user_id.to_string(),
                provider_id: provider_id.to_string(),
                effort_data,
                updated_at: Utc::now(),
            },
        );
        tracing::info!(
            "Stored climbing snapshot for user {} ({} snapshots)",
            user_id,
            self.snapshots.len()
        );
        Ok(previous.is_some())
    }

    async fn climb_snapshot(&self, provider_id: &str) -> Result<Option<ClimbSnapshot>, StoreError> {
        Ok(self.snapshots.get(provider_id).map(|entry| entry.clone()))
    }
}
