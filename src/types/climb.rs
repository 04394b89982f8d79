use serde::{Deserialize, Serialize};

/// Fixed distance bands, each a half-open meter range around its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum DistanceBand {
    M200,
    M500,
    M1000,
    M2000,
    M3000,
    M6000,
    M10000,
}

impl DistanceBand {
    pub const ALL: [DistanceBand; 7] = [
        DistanceBand::M200,
        DistanceBand::M500,
        DistanceBand::M1000,
        DistanceBand::M2000,
        DistanceBand::M3000,
        DistanceBand::M6000,
        DistanceBand::M10000,
    ];

    pub fn label(&self) -> u32 {
        match self {
            DistanceBand::M200 => 200,
            DistanceBand::M500 => 500,
            DistanceBand::M1000 => 1000,
            DistanceBand::M2000 => 2000,
            DistanceBand::M3000 => 3000,
            DistanceBand::M6000 => 6000,
            DistanceBand::M10000 => 10000,
        }
    }

    /// `[lower, upper)` in meters.
    pub fn range(&self) -> (f64, f64) {
        match self {
            DistanceBand::M200 => (100.0, 350.0),
            DistanceBand::M500 => (350.0, 600.0),
            DistanceBand::M1000 => (600.0, 1400.0),
            DistanceBand::M2000 => (1400.0, 2400.0),
            DistanceBand::M3000 => (2400.0, 4500.0),
            DistanceBand::M6000 => (4500.0, 8000.0),
            DistanceBand::M10000 => (8000.0, 12000.0),
        }
    }

    pub fn for_distance(distance: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|band| {
            let (lower, upper) = band.range();
            distance >= lower && distance < upper
        })
    }

    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|band| band == self)
            .unwrap_or_default()
    }
}

impl From<DistanceBand> for u32 {
    fn from(band: DistanceBand) -> Self {
        band.label()
    }
}

impl TryFrom<u32> for DistanceBand {
    type Error = String;

    fn try_from(label: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|band| band.label() == label)
            .ok_or_else(|| format!("unknown distance band {}", label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Steepness {
    Normal,
    Steep,
}

impl Steepness {
    pub const ALL: [Steepness; 2] = [Steepness::Normal, Steepness::Steep];

    fn index(&self) -> usize {
        match self {
            Steepness::Normal => 0,
            Steepness::Steep => 1,
        }
    }
}

/// One timed ascent of a segment, the unit the categorizer scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbEffort {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub elapsed_time: u64,
    pub elevation_high: f64,
    pub elevation_low: f64,
    /// Percent. Derived from gain and distance when absent.
    pub average_grade: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimbBucket {
    #[serde(rename = "distance")]
    pub band: DistanceBand,
    pub steepness: Steepness,
    pub vam: f64,
}

pub const BUCKET_COUNT: usize = DistanceBand::ALL.len() * Steepness::ALL.len();

/// Best VAM per (band, steepness). Always holds every bucket, in band order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimbTable {
    buckets: [ClimbBucket; BUCKET_COUNT],
}

impl Default for ClimbTable {
    fn default() -> Self {
        let buckets = std::array::from_fn(|i| ClimbBucket {
            band: DistanceBand::ALL[i / Steepness::ALL.len()],
            steepness: Steepness::ALL[i % Steepness::ALL.len()],
            vam: 0.0,
        });
        Self { buckets }
    }
}

impl ClimbTable {
    fn slot(band: DistanceBand, steepness: Steepness) -> usize {
        band.index() * Steepness::ALL.len() + steepness.index()
    }

    pub fn get(&self, band: DistanceBand, steepness: Steepness) -> f64 {
        self.buckets[Self::slot(band, steepness)].vam
    }

    pub(crate) fn set(&mut self, band: DistanceBand, steepness: Steepness, vam: f64) {
        self.buckets[Self::slot(band, steepness)].vam = vam;
    }

    pub fn buckets(&self) -> &[ClimbBucket] {
        &self.buckets
    }
}
