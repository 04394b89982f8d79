use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default, alias = "total_elevation_gain")]
    pub elevation_gain: f64,
    pub start_date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub activity_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetail {
    pub id: u64,
    #[serde(default)]
    pub segment_efforts: Vec<SegmentEffort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEffort {
    pub id: u64,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub distance: f64,
    pub segment: EffortSegment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortSegment {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elevation_high: f64,
    #[serde(default)]
    pub elevation_low: f64,
    #[serde(default)]
    pub climb_category: u8,
    #[serde(default)]
    pub average_grade: Option<f64>,
}

/// The athlete a bearer credential belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
}

impl Athlete {
    /// Key under which this athlete's activities, cursor and snapshot are stored.
    pub fn user_key(&self) -> String {
        self.id.to_string()
    }
}
