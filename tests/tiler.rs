use vamscout::{
    error::BoundsError,
    pipeline::tiler::{query_targets, split, target_tile_size},
    types::bounds::BoundingBox,
};

const EPS: f64 = 1e-9;

#[test]
fn small_box_is_queried_whole() {
    let bbox = BoundingBox::new(45.0, 6.0, 47.0, 9.0).expect("bbox");
    assert_eq!(split(&bbox), vec![bbox]);
    assert_eq!(query_targets(&bbox), vec![bbox]);
}

#[test]
fn box_at_threshold_is_not_split() {
    let bbox = BoundingBox::new(0.0, 0.0, 1.0, 17.0).expect("bbox");
    assert_eq!(bbox.area(), 17.0);
    assert_eq!(split(&bbox), vec![bbox]);
}

#[test]
fn medium_box_uses_smaller_tiles() {
    let bbox = BoundingBox::new(40.0, 0.0, 42.0, 12.0).expect("bbox");
    assert_eq!(target_tile_size(bbox.area()), 8.5);

    let tiles = split(&bbox);
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].ne_lon, 6.0);
    assert_eq!(tiles[1].sw_lon, 6.0);
    assert!(tiles.iter().all(|t| t.sw_lat == 40.0 && t.ne_lat == 42.0));
}

#[test]
fn large_box_is_split_into_grid_plus_original() {
    let bbox = BoundingBox::new(-10.0, -10.0, 10.0, 10.0).expect("bbox");
    assert_eq!(target_tile_size(bbox.area()), 10.0);

    let tiles = split(&bbox);
    assert_eq!(tiles.len(), 4);

    let targets = query_targets(&bbox);
    assert_eq!(targets.len(), 5);
    assert_eq!(targets.last(), Some(&bbox));
}

#[test]
fn tiles_cover_the_box_exactly() {
    let bbox = BoundingBox::new(-10.3, 20.1, 12.7, 47.9).expect("bbox");
    let tiles = split(&bbox);
    let rows = 3;
    let cols = 3;
    assert_eq!(tiles.len(), rows * cols);

    for tile in &tiles {
        assert!(tile.sw_lat >= bbox.sw_lat && tile.ne_lat <= bbox.ne_lat);
        assert!(tile.sw_lon >= bbox.sw_lon && tile.ne_lon <= bbox.ne_lon);
        assert!(tile.ne_lat > tile.sw_lat && tile.ne_lon > tile.sw_lon);
    }

    assert_eq!(tiles[0].sw_lat, bbox.sw_lat);
    assert_eq!(tiles[0].sw_lon, bbox.sw_lon);
    let last = tiles[tiles.len() - 1];
    assert_eq!(last.ne_lat, bbox.ne_lat);
    assert_eq!(last.ne_lon, bbox.ne_lon);

    for row in 0..rows {
        for col in 0..cols {
            let tile = tiles[row * cols + col];
            if col + 1 < cols {
                let right = tiles[row * cols + col + 1];
                assert!((tile.ne_lon - right.sw_lon).abs() < EPS);
            }
            if row + 1 < rows {
                let above = tiles[(row + 1) * cols + col];
                assert!((tile.ne_lat - above.sw_lat).abs() < EPS);
            }
        }
    }

    let covered: f64 = tiles.iter().map(BoundingBox::area).sum();
    assert!((covered - bbox.area()).abs() < 1e-6);
}

#[test]
fn invalid_boxes_are_rejected() {
    assert_eq!(
        BoundingBox::new(10.0, 0.0, 5.0, 1.0),
        Err(BoundsError::Inverted)
    );
    assert_eq!(
        BoundingBox::new(f64::NAN, 0.0, 5.0, 1.0),
        Err(BoundsError::NonFinite)
    );
    assert_eq!(
        BoundingBox::new(0.0, 0.0, 95.0, 1.0),
        Err(BoundsError::OutOfRange)
    );
}

#[test]
fn bounds_query_uses_explore_order() {
    let bbox = BoundingBox::from_coords([37.8, -122.5, 37.9, -122.4]).expect("bbox");
    assert_eq!(bbox.to_query(), "37.8,-122.5,37.9,-122.4");
}
