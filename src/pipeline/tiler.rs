use crate::types::bounds::{BoundingBox, Tile};

/// Boxes at or below this area (deg²) are queried whole.
pub const SPLIT_THRESHOLD: f64 = 17.0;
const LARGE_AREA: f64 = 30.0;
const LARGE_TILE_SIZE: f64 = 10.0;
const MEDIUM_TILE_SIZE: f64 = 8.5;

pub fn needs_split(area: f64) -> bool {
    area > SPLIT_THRESHOLD
}

pub fn target_tile_size(area: f64) -> f64 {
    if area > LARGE_AREA {
        LARGE_TILE_SIZE
    } else {
        MEDIUM_TILE_SIZE
    }
}

/// Partitions `bbox` into a row-major grid of tiles no larger than the target size.
pub fn split(bbox: &BoundingBox) -> Vec<Tile> {
    let area = bbox.area();
    if !needs_split(area) {
        return vec![*bbox];
    }

    let target = target_tile_size(area);
    let width = bbox.width();
    let height = bbox.height();
    let num_rows = (height / target).ceil().max(1.0) as usize;
    let num_cols = (width / target).ceil().max(1.0) as usize;

    let mut tiles = Vec::with_capacity(num_rows * num_cols);
    for row in 0..num_rows {
        let sw_lat = bbox.sw_lat + (row as f64 * height) / num_rows as f64;
        let ne_lat = if row + 1 == num_rows {
            bbox.ne_lat
        } else {
            (bbox.sw_lat + ((row + 1) as f64 * height) / num_rows as f64).min(bbox.ne_lat)
        };

        for col in 0..num_cols {
            let sw_lon = bbox.sw_lon + (col as f64 * width) / num_cols as f64;
            let ne_lon = if col + 1 == num_cols {
                bbox.ne_lon
            } else {
                (bbox.sw_lon + ((col + 1) as f64 * width) / num_cols as f64).min(bbox.ne_lon)
            };

            tiles.push(Tile {
                sw_lat,
                sw_lon,
                ne_lat,
                ne_lon,
            });
        }
    }

    tracing::debug!(
        "Split {:.2} deg² into {}x{} tiles of target size {}",
        area,
        num_rows,
        num_cols,
        target
    );
    tiles
}

/// Tiles plus the unsplit box, which the explore ranking can answer differently.
/// An unsplit box is only queried once.
pub fn query_targets(bbox: &BoundingBox) -> Vec<Tile> {
    let mut targets = split(bbox);
    if targets.len() > 1 {
        targets.push(*bbox);
    }
    targets
}
