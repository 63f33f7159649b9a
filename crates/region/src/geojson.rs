//! GeoJSON boundary parsing.
//!
//! Polygons are collected from `Polygon`, `MultiPolygon`,
//! `GeometryCollection`, `Feature` and `FeatureCollection` objects.
//! Every polygon found becomes part of the boundary union; non-areal
//! geometries are skipped.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{RegionError, Result};
use crate::polygon::{Polygon, Ring};
use crate::wkt::validate_coordinates;

/// Any GeoJSON object, with only the members needed to find polygons.
#[derive(Debug, Deserialize)]
struct GeoJsonObject {
    /// Type identifier ("Polygon", "Feature", ...).
    #[serde(rename = "type")]
    type_: String,

    #[serde(default)]
    coordinates: Option<Value>,

    #[serde(default)]
    geometries: Option<Vec<GeoJsonObject>>,

    #[serde(default)]
    geometry: Option<Box<GeoJsonObject>>,

    #[serde(default)]
    features: Option<Vec<GeoJsonObject>>,
}

type PolygonCoords = Vec<Vec<Vec<f64>>>;

/// Parse a GeoJSON document into its polygons.
pub fn parse_polygons(text: &str) -> Result<Vec<Polygon>> {
    let object: GeoJsonObject = serde_json::from_str(text)?;
    let mut polygons = Vec::new();
    collect(&object, &mut polygons)?;

    if polygons.is_empty() {
        return Err(RegionError::InvalidGeoJson(
            "document contains no Polygon or MultiPolygon geometry".to_string(),
        ));
    }
    Ok(polygons)
}

fn collect(object: &GeoJsonObject, out: &mut Vec<Polygon>) -> Result<()> {
    match object.type_.as_str() {
        "Polygon" => {
            let coords: PolygonCoords = coordinates(object)?;
            out.push(polygon_from_coords(coords)?);
        }
        "MultiPolygon" => {
            let coords: Vec<PolygonCoords> = coordinates(object)?;
            for polygon in coords {
                out.push(polygon_from_coords(polygon)?);
            }
        }
        "GeometryCollection" => {
            for geometry in object.geometries.iter().flatten() {
                collect(geometry, out)?;
            }
        }
        "Feature" => {
            if let Some(geometry) = &object.geometry {
                collect(geometry, out)?;
            }
        }
        "FeatureCollection" => {
            for feature in object.features.iter().flatten() {
                collect(feature, out)?;
            }
        }
        other => {
            debug!(geometry_type = %other, "Skipping non-polygon GeoJSON object");
        }
    }
    Ok(())
}

fn coordinates<T: serde::de::DeserializeOwned>(object: &GeoJsonObject) -> Result<T> {
    let value = object.coordinates.clone().ok_or_else(|| {
        RegionError::InvalidGeoJson(format!("{} without coordinates", object.type_))
    })?;
    Ok(serde_json::from_value(value)?)
}

fn polygon_from_coords(coords: PolygonCoords) -> Result<Polygon> {
    let mut rings = coords
        .into_iter()
        .map(ring_from_positions)
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let exterior = rings
        .next()
        .ok_or_else(|| RegionError::InvalidGeoJson("Polygon has no rings".to_string()))?;

    Ok(Polygon::new(exterior, rings.collect()))
}

fn ring_from_positions(positions: Vec<Vec<f64>>) -> Result<Ring> {
    if positions.len() < 4 {
        return Err(RegionError::InvalidGeoJson(format!(
            "linear ring needs at least 4 positions, got {}",
            positions.len()
        )));
    }

    let vertices = positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => {
                validate_coordinates(*lon, *lat)?;
                Ok((*lon, *lat))
            }
            _ => Err(RegionError::InvalidGeoJson(
                "position needs at least longitude and latitude".to_string(),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ring::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polygon_geometry() {
        let polygons = parse_polygons(
            r#"{"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
        )
        .unwrap();
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn test_parse_feature_collection_with_properties() {
        let polygons = parse_polygons(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"NAME": "Karnes"},
                     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                    {"type": "Feature", "properties": {"NAME": "Wilson"},
                     "geometry": {"type": "MultiPolygon", "coordinates": [
                        [[[2,2],[3,2],[3,3],[2,2]]],
                        [[[4,4],[5,4],[5,5,100.0],[4,4]]]
                     ]}},
                    {"type": "Feature", "properties": {}, "geometry": null},
                    {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [9, 9]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(polygons.len(), 3);
    }

    #[test]
    fn test_parse_without_polygons() {
        let result = parse_polygons(r#"{"type": "Point", "coordinates": [1, 2]}"#);
        assert!(matches!(result, Err(RegionError::InvalidGeoJson(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_polygons("{not json");
        assert!(matches!(result, Err(RegionError::InvalidGeoJson(_))));
    }

    #[test]
    fn test_parse_out_of_range() {
        let result = parse_polygons(
            r#"{"type": "Polygon", "coordinates": [[[0,0],[200,0],[1,1],[0,0]]]}"#,
        );
        assert!(matches!(result, Err(RegionError::OutOfRange(_))));
    }
}
