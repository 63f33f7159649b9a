//! ESRI shapefile polygon parsing.
//!
//! Only the `.shp` geometry is read. Coordinates must already be in
//! decimal degrees; projected shapefiles fail the range check.

use std::path::Path;

use crate::error::{RegionError, Result};
use crate::polygon::{Polygon, Ring};
use crate::wkt::validate_coordinates;

/// Read every polygon record of a shapefile.
pub fn read_polygons(path: &Path) -> Result<Vec<Polygon>> {
    let shapes = shapefile::read_shapes_as::<_, shapefile::Polygon>(path).map_err(|e| {
        RegionError::Shapefile {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let mut polygons = Vec::new();
    for shape in &shapes {
        polygons.extend(convert_shape(shape)?);
    }
    Ok(polygons)
}

/// Split one shapefile record into polygons.
///
/// Each outer ring starts a polygon; inner rings are holes of the outer
/// ring preceding them.
pub fn convert_shape(shape: &shapefile::Polygon) -> Result<Vec<Polygon>> {
    let mut polygons: Vec<(Ring, Vec<Ring>)> = Vec::new();

    for ring in shape.rings() {
        match ring {
            shapefile::PolygonRing::Outer(points) => {
                polygons.push((ring_from_points(points)?, Vec::new()));
            }
            shapefile::PolygonRing::Inner(points) => {
                let (_, holes) = polygons.last_mut().ok_or_else(|| {
                    RegionError::InvalidRing("inner ring before any outer ring".to_string())
                })?;
                holes.push(ring_from_points(points)?);
            }
        }
    }

    Ok(polygons
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect())
}

fn ring_from_points(points: &[shapefile::Point]) -> Result<Ring> {
    let vertices = points
        .iter()
        .map(|p| validate_coordinates(p.x, p.y).map(|_| (p.x, p.y)))
        .collect::<Result<Vec<_>>>()?;
    Ring::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Location;
    use shapefile::{Point, PolygonRing};

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0, y0 + size),
            Point::new(x0 + size, y0 + size),
            Point::new(x0 + size, y0),
            Point::new(x0, y0),
        ]
    }

    #[test]
    fn test_outer_ring_with_hole() {
        let shape = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(-98.0, 28.0, 4.0)),
            PolygonRing::Inner(square(-97.0, 29.0, 2.0)),
        ]);
        let polygons = convert_shape(&shape).unwrap();

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].holes().len(), 1);
        assert_eq!(polygons[0].locate(-97.5, 28.5), Location::Inside);
        assert_eq!(polygons[0].locate(-96.0, 30.0), Location::Outside);
    }

    #[test]
    fn test_multipart_record() {
        let shape = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(-98.0, 28.0, 1.0)),
            PolygonRing::Outer(square(-96.0, 28.0, 1.0)),
        ]);
        assert_eq!(convert_shape(&shape).unwrap().len(), 2);
    }

    #[test]
    fn test_projected_coordinates_rejected() {
        let shape = shapefile::Polygon::new(PolygonRing::Outer(square(500_000.0, 3_200_000.0, 1000.0)));
        assert!(matches!(convert_shape(&shape), Err(RegionError::OutOfRange(_))));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("county.shp");
        let shape = shapefile::Polygon::new(PolygonRing::Outer(square(-98.0, 28.0, 1.0)));
        shapefile::ShapeWriter::from_path(&path)
            .unwrap()
            .write_shapes(&[shape])
            .unwrap();

        let polygons = read_polygons(&path).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].locate(-97.5, 28.5), Location::Inside);
    }

    #[test]
    fn test_missing_file() {
        let result = read_polygons(Path::new("/nonexistent/county.shp"));
        assert!(matches!(result, Err(RegionError::Shapefile { .. })));
    }
}
