//! End-to-end regridding scenarios: filter, interpolate, mask.

use geo_common::{BoundingBox, FilteredPointSet};
use grid_processor::{GridError, GridMasker, InterpolationMethod, RegridConfig, ScatteredInterpolator};
use region::{EdgePolicy, RegionBoundary, RegionFilter};
use test_utils::{
    assert_approx_eq, assert_non_negative, collinear_observations, corner_observations, fixtures,
    plane_observations, scatter_observations,
};

fn config(nx: usize, ny: usize) -> RegridConfig {
    RegridConfig {
        nx,
        ny,
        ..RegridConfig::default()
    }
}

// ============================================================================
// Canonical scenarios
// ============================================================================

#[test]
fn test_three_corners_of_unit_square() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::UNIT_SQUARE).unwrap();
    let points = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&corner_observations());
    assert_eq!(points.len(), 3);

    let config = config(11, 11);
    let (mesh, field) = ScatteredInterpolator::from_config(&config)
        .interpolate(&points)
        .unwrap();
    assert_eq!(mesh.spec.bbox, BoundingBox::new(0.0, 0.0, 1.0, 1.0));

    // Linear on one triangle reproduces 10 + 10 * lat - 15 * lon.
    assert_approx_eq!(field.get(2, 2).unwrap(), 9.0, 1e-9);
    assert_approx_eq!(field.get(8, 1).unwrap(), -1.0, 1e-9);
    // Beyond the hypotenuse there is no estimate.
    assert!(field.get(6, 6).unwrap().is_nan());

    let masked = GridMasker::from_config(&config)
        .apply(&mesh, &field, &boundary)
        .unwrap();

    assert_non_negative!(masked.data);
    assert_eq!(masked.get(8, 1), Some(0.0));
    assert_approx_eq!(masked.get(2, 2).unwrap(), 9.0, 1e-9);
    // The square's own edges are excluded by the grid mask.
    for i in 0..11 {
        assert!(masked.get(i, 0).unwrap().is_nan());
        assert!(masked.get(0, i).unwrap().is_nan());
    }
    let cell = masked.get(9, 1).unwrap();
    assert!(cell.is_nan() || cell == 0.0);
}

#[test]
fn test_no_points_inside_region() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::KARNES_COUNTY).unwrap();
    let far_away = scatter_observations(BoundingBox::new(-90.0, 40.0, -89.0, 41.0), 10, 10, 3, |_, _| 1.0);

    let points = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&far_away);
    assert!(points.is_empty());

    let result = ScatteredInterpolator::default().interpolate(&points);
    assert!(matches!(result, Err(GridError::EmptyPointSet)));
}

#[test]
fn test_concave_region_notch_is_masked() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::L_SHAPE).unwrap();
    let observations = scatter_observations(BoundingBox::new(0.0, 0.0, 2.0, 2.0), 20, 20, 9, |lon, lat| {
        5.0 + lon - lat
    });
    let points = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&observations);

    let config = config(40, 40);
    let (mesh, field) = ScatteredInterpolator::from_config(&config)
        .interpolate(&points)
        .unwrap();

    let in_notch = |lon: f64, lat: f64| lon > 1.0 && lat > 1.0;

    // The convex hull of the L spills into the notch before masking.
    assert!(mesh
        .cells()
        .any(|(idx, lon, lat)| in_notch(lon, lat) && !field.data[idx].is_nan()));

    let masked = GridMasker::from_config(&config)
        .apply(&mesh, &field, &boundary)
        .unwrap();

    for (idx, lon, lat) in mesh.cells() {
        if in_notch(lon, lat) {
            assert!(masked.data[idx].is_nan(), "notch cell ({lon}, {lat}) kept a value");
        }
    }
    assert!(masked.valid_count() > 0);
}

#[test]
fn test_collinear_points_are_degenerate() {
    let points: FilteredPointSet = collinear_observations().iter().collect();
    let result = ScatteredInterpolator::default().interpolate(&points);
    assert!(matches!(
        result,
        Err(GridError::DegenerateGeometry {
            distinct_positions: 5,
            ..
        })
    ));
}

// ============================================================================
// Field properties
// ============================================================================

#[test]
fn test_linear_reproduces_plane_inside_hull() {
    let bbox = BoundingBox::new(-98.2, 28.4, -97.1, 29.3);
    let observations = plane_observations(bbox, 15, 12, 21, (4.0, 0.5, -1.5));
    let points: FilteredPointSet = observations.iter().collect();

    let (mesh, field) = ScatteredInterpolator::new(30, 30, InterpolationMethod::Linear)
        .interpolate(&points)
        .unwrap();

    let mut checked = 0;
    for (idx, lon, lat) in mesh.cells() {
        let value = field.data[idx];
        if !value.is_nan() {
            assert_approx_eq!(value, 4.0 + 0.5 * lon - 1.5 * lat, 1e-8);
            checked += 1;
        }
    }
    assert!(checked > 600);
}

#[test]
fn test_mask_only_adds_nan_and_is_idempotent() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::KARNES_COUNTY).unwrap();
    let observations = scatter_observations(BoundingBox::new(-98.2, 28.5, -97.5, 29.2), 25, 25, 4, |lon, lat| {
        (lon * 7.0).sin() * (lat * 5.0).cos()
    });
    let points = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&observations);

    let config = config(50, 50);
    let (mesh, field) = ScatteredInterpolator::from_config(&config)
        .interpolate(&points)
        .unwrap();
    let masker = GridMasker::from_config(&config);
    let masked = masker.apply(&mesh, &field, &boundary).unwrap();

    for (before, after) in field.data.iter().zip(&masked.data) {
        if before.is_nan() {
            assert!(after.is_nan());
        }
    }
    assert_non_negative!(masked.data);
    assert!(masked.same_values(&masker.apply(&mesh, &masked, &boundary).unwrap()));
}

#[test]
fn test_nearest_method_is_masked_too() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::UNIT_SQUARE).unwrap();
    let points = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&corner_observations());

    let config = RegridConfig {
        nx: 11,
        ny: 11,
        interpolation: InterpolationMethod::Nearest,
        ..RegridConfig::default()
    };
    let (mesh, field) = ScatteredInterpolator::from_config(&config)
        .interpolate(&points)
        .unwrap();
    assert_eq!(field.valid_count(), 121);

    let masked = GridMasker::from_config(&config)
        .apply(&mesh, &field, &boundary)
        .unwrap();
    // 9 x 9 interior cells survive the exclusive mask.
    assert_eq!(masked.valid_count(), 81);
    assert_non_negative!(masked.data);
}
