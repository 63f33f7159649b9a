//! Containment and filtering tests against canonical boundaries.

use std::io::Write;

use geo_common::{BoundingBox, ObservationPoint};
use region::{
    BoundaryCatalog, BoundarySource, EdgePolicy, Location, RegionBoundary, RegionError,
    RegionFilter,
};
use test_utils::{corner_observations, fixtures, scatter_observations};

// ============================================================================
// Containment consistency
// ============================================================================

#[test]
fn test_retained_points_are_inside_and_dropped_points_are_not() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::L_SHAPE).unwrap();
    let points = scatter_observations(BoundingBox::new(-0.5, -0.5, 2.5, 2.5), 30, 30, 11, |lon, lat| {
        lon + lat
    });

    for policy in [EdgePolicy::Inclusive, EdgePolicy::Exclusive] {
        let filter = RegionFilter::new(&boundary, policy);
        let retained = filter.filter(&points);

        let expected: Vec<&ObservationPoint> = points
            .iter()
            .filter(|p| boundary.contains(p.longitude, p.latitude, policy))
            .collect();
        assert_eq!(retained.len(), expected.len());

        for p in retained.iter() {
            assert!(boundary.contains(p.longitude, p.latitude, policy));
            // Nothing from the notch survives.
            assert!(!(p.longitude > 1.0 && p.latitude > 1.0));
        }
    }
}

#[test]
fn test_filtered_columns_have_equal_length() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::KARNES_COUNTY).unwrap();
    let points = scatter_observations(
        BoundingBox::new(-98.3, 28.5, -97.4, 29.2),
        40,
        40,
        5,
        |_, _| 1.0e15,
    );

    let retained = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&points);
    assert!(!retained.is_empty());
    assert!(retained.len() < points.len());
    assert_eq!(retained.values().len(), retained.latitudes().len());
    assert_eq!(retained.latitudes().len(), retained.longitudes().len());
}

#[test]
fn test_corner_points_follow_edge_policy() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::UNIT_SQUARE).unwrap();
    let points = corner_observations();

    let inclusive = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&points);
    assert_eq!(inclusive.len(), 3);

    let exclusive = RegionFilter::new(&boundary, EdgePolicy::Exclusive).filter(&points);
    assert!(exclusive.is_empty());
}

#[test]
fn test_points_all_outside() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::UNIT_SQUARE).unwrap();
    let points = scatter_observations(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 5, 5, 2, |_, _| 1.0);

    let retained = RegionFilter::new(&boundary, EdgePolicy::Inclusive).filter(&points);
    assert!(retained.is_empty());
}

// ============================================================================
// Union semantics
// ============================================================================

#[test]
fn test_hole_excluded_from_region() {
    let boundary = RegionBoundary::from_wkt(fixtures::wkt::SQUARE_WITH_HOLE).unwrap();
    assert_eq!(boundary.locate(2.0, 2.0), Location::Outside);
    assert_eq!(boundary.locate(0.5, 2.0), Location::Inside);
}

#[test]
fn test_geojson_counties_union_dissolves_shared_border() {
    let boundary = RegionBoundary::from_geojson(fixtures::geojson::TWO_COUNTY_COLLECTION).unwrap();
    assert_eq!(boundary.len(), 2);

    // On the shared border: inside the union even under the exclusive policy.
    assert!(boundary.contains(-97.5, 28.25, EdgePolicy::Exclusive));
    // On the outer border: excluded.
    assert!(!boundary.contains(-97.0, 28.25, EdgePolicy::Exclusive));
    assert!(boundary.contains(-97.0, 28.25, EdgePolicy::Inclusive));
}

#[test]
fn test_multipolygon_seam_and_outer_edges() {
    let wkt = RegionBoundary::from_wkt(fixtures::wkt::TWO_COUNTIES).unwrap();
    for (lon, lat) in [(0.5, 0.5), (1.0, 0.5), (1.5, 0.5), (2.0, 0.5), (2.5, 0.5)] {
        let expected = (0.0..2.0).contains(&lon) && lon > 0.0;
        assert_eq!(wkt.contains(lon, lat, EdgePolicy::Exclusive), expected, "at {lon}");
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn test_catalog_loads_geojson_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(fixtures::geojson::TWO_COUNTY_COLLECTION.as_bytes())
        .unwrap();

    let catalog = BoundaryCatalog::new()
        .with_option(
            "efs_counties",
            BoundarySource::GeoJsonFile {
                path: file.path().to_path_buf(),
            },
        )
        .with_option(
            "karnes_county",
            BoundarySource::Wkt {
                wkt: fixtures::wkt::KARNES_COUNTY.to_string(),
            },
        );

    assert_eq!(catalog.names(), vec!["efs_counties", "karnes_county"]);
    let boundary = catalog.load("efs_counties").unwrap();
    assert_eq!(boundary.extent(), (-98.0, -97.0, 28.0, 28.5));
}

#[test]
fn test_catalog_region_not_found() {
    let catalog = BoundaryCatalog::new();
    assert!(matches!(
        catalog.load("efs_counties"),
        Err(RegionError::RegionNotFound { .. })
    ));
}

#[test]
fn test_catalog_deserializes_from_json() {
    let catalog: BoundaryCatalog = serde_json::from_str(
        r#"{
            "unit": {"format": "wkt", "wkt": "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))"},
            "counties": {"format": "geojson_file", "path": "shapes/counties.geojson"}
        }"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.load("unit").is_ok());
}
