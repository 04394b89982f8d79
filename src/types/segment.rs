use serde::{Deserialize, Serialize};

/// Segment as returned by the explore endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub avg_grade: f64,
    #[serde(default)]
    pub elev_difference: f64,
    /// 0 = uncategorized, 1..=5 increasing difficulty.
    #[serde(default)]
    pub climb_category: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

/// Segment detail from the authenticated API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDetail {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub average_grade: f64,
    #[serde(default)]
    pub maximum_grade: f64,
    #[serde(default)]
    pub elevation_high: f64,
    #[serde(default)]
    pub elevation_low: f64,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub climb_category: u8,
    #[serde(default)]
    pub effort_count: Option<u64>,
    #[serde(default)]
    pub athlete_count: Option<u64>,
}

/// Top row of a public segment leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: Option<u32>,
    pub name: String,
    pub speed: String,
    pub power: String,
    pub vam: Option<f64>,
    /// Time as displayed on the page, e.g. `12:34`.
    pub time: String,
    pub time_seconds: Option<u64>,
}

/// Fields scraped from a public segment page. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPage {
    pub name: String,
    pub distance: Option<f64>,
    pub average_grade: Option<f64>,
    pub maximum_grade: Option<f64>,
    pub elevation_high: Option<f64>,
    pub elevation_low: Option<f64>,
    pub elevation_gain: Option<f64>,
    pub climb_category: Option<u8>,
    pub attempts: Option<u64>,
    pub leader: Option<LeaderboardEntry>,
}

/// Discovered segment plus whatever the detail page yielded.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSegment {
    pub segment: RawSegment,
    pub page: Option<SegmentPage>,
}

impl EnrichedSegment {
    pub fn elevation_high(&self) -> Option<f64> {
        self.page.as_ref().and_then(|p| p.elevation_high)
    }

    pub fn elevation_low(&self) -> Option<f64> {
        self.page.as_ref().and_then(|p| p.elevation_low)
    }

    /// Scraped gain, then high minus low, then the API's own elevation difference.
    pub fn elevation_gain(&self) -> f64 {
        let page = self.page.as_ref();
        page.and_then(|p| p.elevation_gain)
            .or_else(|| match (self.elevation_high(), self.elevation_low()) {
                (Some(high), Some(low)) => Some(high - low),
                _ => None,
            })
            .unwrap_or(self.segment.elev_difference)
    }

    pub fn maximum_grade(&self) -> Option<f64> {
        self.page.as_ref().and_then(|p| p.maximum_grade)
    }

    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.page.as_ref().and_then(|p| p.leader.as_ref())
    }

    pub fn best_time(&self) -> Option<u64> {
        self.leader().and_then(|l| l.time_seconds)
    }

    pub fn best_athlete_vam(&self) -> Option<f64> {
        self.leader().and_then(|l| l.vam)
    }

    pub fn category(&self) -> u8 {
        self.page
            .as_ref()
            .and_then(|p| p.climb_category)
            .filter(|c| *c > 0)
            .unwrap_or(self.segment.climb_category)
    }
}

/// One line of the discovery table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub id: u64,
    pub name: String,
    pub category: u8,
    pub distance: f64,
    #[serde(rename = "averageGrade")]
    pub average_grade: f64,
    pub maximum_grade: f64,
    pub elevation_high: f64,
    pub elevation_low: f64,
    #[serde(rename = "elevationGain")]
    pub elevation_gain: f64,
    /// Leader's time in seconds, 0 when unknown.
    pub time: u64,
    #[serde(rename = "kVAM")]
    pub k_vam: f64,
    /// Reserved, always 0.
    #[serde(rename = "qVAM")]
    pub q_vam: f64,
}

impl From<&EnrichedSegment> for SegmentRow {
    fn from(enriched: &EnrichedSegment) -> Self {
        let segment = &enriched.segment;
        let name = enriched
            .page
            .as_ref()
            .map(|p| p.name.trim())
            .filter(|n| segment.name.is_empty() && !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| segment.name.clone());

        Self {
            id: segment.id,
            name,
            category: enriched.category(),
            distance: segment.distance,
            average_grade: segment.avg_grade,
            maximum_grade: enriched.maximum_grade().unwrap_or(0.0),
            elevation_high: enriched.elevation_high().unwrap_or(0.0),
            elevation_low: enriched.elevation_low().unwrap_or(0.0),
            elevation_gain: enriched.elevation_gain(),
            time: enriched.best_time().unwrap_or(0),
            k_vam: enriched.best_athlete_vam().unwrap_or(0.0),
            q_vam: 0.0,
        }
    }
}
