use crate::error::VamError;
use crate::types::climb::{ClimbEffort, ClimbTable, DistanceBand, Steepness};

/// `distance * grade` above which an effort counts as steep.
pub const STEEP_SCORE_THRESHOLD: f64 = 32_000.0;
/// VAM values above this are record noise, never a best.
pub const VAM_CEILING: f64 = 3_000.0;

/// VAM in meters per hour for a gain climbed in `time_in_minutes`.
pub fn calculate_vam(
    elevation_high: f64,
    elevation_low: f64,
    time_in_minutes: f64,
) -> Result<f64, VamError> {
    if time_in_minutes.is_nan() || time_in_minutes <= 0.0 {
        return Err(VamError::NonPositiveTime(time_in_minutes));
    }
    let elevation_gain = elevation_high - elevation_low;
    if elevation_gain < 0.0 {
        return Err(VamError::NegativeElevationGain(elevation_gain));
    }
    Ok((elevation_gain * 60.0) / time_in_minutes)
}

pub fn steepness(distance: f64, grade: f64) -> Steepness {
    if distance * grade > STEEP_SCORE_THRESHOLD {
        Steepness::Steep
    } else {
        Steepness::Normal
    }
}

/// Band, steepness and VAM for one effort, or `None` when it does not qualify.
/// A zero-duration effort qualifies with a VAM of 0.
pub fn score(effort: &ClimbEffort) -> Option<(DistanceBand, Steepness, f64)> {
    let elevation_gain = effort.elevation_high - effort.elevation_low;
    if elevation_gain <= 0.0 {
        return None;
    }

    let grade = match effort.average_grade {
        Some(grade) => grade,
        None if effort.distance > 0.0 => elevation_gain / effort.distance * 100.0,
        None => return None,
    };
    if grade <= 0.0 {
        return None;
    }

    let band = DistanceBand::for_distance(effort.distance)?;
    let class = steepness(effort.distance, grade);

    let time_in_minutes = effort.elapsed_time as f64 / 60.0;
    let vam = if time_in_minutes > 0.0 {
        (elevation_gain * 60.0) / time_in_minutes
    } else {
        0.0
    };

    Some((band, class, vam))
}

/// Best plausible VAM per bucket, rounded to two decimals.
pub fn categorize(efforts: &[ClimbEffort]) -> ClimbTable {
    let mut table = ClimbTable::default();

    for effort in efforts {
        let Some((band, class, vam)) = score(effort) else {
            continue;
        };
        if vam > VAM_CEILING {
            tracing::debug!(
                "Ignoring implausible VAM {:.0} over {:.0} m",
                vam,
                effort.distance
            );
            continue;
        }

        let rounded = round2(vam);
        if rounded > table.get(band, class) {
            table.set(band, class, rounded);
        }
    }

    table
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
