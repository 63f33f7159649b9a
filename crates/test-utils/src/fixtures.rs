//! Common test fixtures for region and grid tests.

use geo_common::ObservationPoint;

/// Boundary geometries as WKT.
pub mod wkt {
    /// The unit square `[0,1] x [0,1]`.
    pub const UNIT_SQUARE: &str = "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))";

    /// L-shaped region inside `[0,2] x [0,2]`; the notch is `(1,2] x (1,2]`.
    pub const L_SHAPE: &str = "POLYGON((0 0, 2 0, 2 1, 1 1, 1 2, 0 2, 0 0))";

    /// Two adjacent squares sharing the edge `lon = 1`.
    pub const TWO_COUNTIES: &str =
        "MULTIPOLYGON(((0 0, 1 0, 1 1, 0 1, 0 0)), ((1 0, 2 0, 2 1, 1 1, 1 0)))";

    /// A square with a square hole in the middle.
    pub const SQUARE_WITH_HOLE: &str =
        "POLYGON((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 3 1, 3 3, 1 3, 1 1))";

    /// Rough outline of a south Texas county (lon/lat degrees).
    pub const KARNES_COUNTY: &str = "POLYGON((-98.13 28.88, -97.91 29.12, -97.58 28.87, \
         -97.57 28.78, -97.77 28.58, -98.09 28.79, -98.13 28.88))";
}

/// Boundary geometries as GeoJSON.
pub mod geojson {
    /// Feature collection with two neighbouring rectangular counties.
    pub const TWO_COUNTY_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"NAME": "West"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-98.0, 28.0], [-97.5, 28.0], [-97.5, 28.5], [-98.0, 28.5], [-98.0, 28.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"NAME": "East"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-97.5, 28.0], [-97.0, 28.0], [-97.0, 28.5], [-97.5, 28.5], [-97.5, 28.0]]]
                }
            }
        ]
    }"#;
}

/// Three observations at corners of the unit square; the value field
/// `10 + 10 * lat - 15 * lon` goes negative near `(1, 0)`.
pub fn corner_observations() -> Vec<ObservationPoint> {
    vec![
        ObservationPoint::new(10.0, 0.0, 0.0),
        ObservationPoint::new(20.0, 1.0, 0.0),
        ObservationPoint::new(-5.0, 0.0, 1.0),
    ]
}

/// Observations along a single line of constant latitude.
pub fn collinear_observations() -> Vec<ObservationPoint> {
    (0..5)
        .map(|k| ObservationPoint::new(k as f64, 0.5, 0.1 + 0.2 * k as f64))
        .collect()
}
