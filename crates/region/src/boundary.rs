//! The study-region boundary: a union of polygons behind an R-tree.

use std::path::Path;

use geo_common::BoundingBox;
use rstar::{RTree, RTreeObject, AABB};

use crate::error::{RegionError, Result};
use crate::polygon::{EdgePolicy, Location, Polygon};
use crate::{geojson, shp, wkt};

/// Probe directions used to decide whether a point on a shared edge
/// between two polygons is interior to their union.
const SEAM_PROBES: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.7071, 0.7071),
    (-0.7071, 0.7071),
    (0.7071, -0.7071),
    (-0.7071, -0.7071),
];

/// Relative probe distance, scaled by the boundary extent.
const SEAM_PROBE_SCALE: f64 = 1e-9;

/// Envelope of one polygon for R-tree storage.
#[derive(Debug, Clone, Copy)]
struct PolygonEnvelope {
    index: usize,
    bounds: [f64; 4],
}

impl RTreeObject for PolygonEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds[0], self.bounds[1]],
            [self.bounds[2], self.bounds[3]],
        )
    }
}

/// One or more polygons treated as a single covering region.
///
/// The boundary is immutable once built; the R-tree over polygon
/// envelopes is the precomputed part of the union and is shared by every
/// containment query.
#[derive(Debug, Clone)]
pub struct RegionBoundary {
    polygons: Vec<Polygon>,
    index: RTree<PolygonEnvelope>,
    bbox: BoundingBox,
    probe_distance: f64,
}

impl RegionBoundary {
    /// Build the union of the given polygons.
    pub fn new(polygons: Vec<Polygon>) -> Result<Self> {
        let bbox = polygons
            .iter()
            .map(Polygon::bbox)
            .reduce(|a, b| a.union(&b))
            .ok_or(RegionError::EmptyBoundary)?;

        let envelopes = polygons
            .iter()
            .enumerate()
            .map(|(index, polygon)| {
                let b = polygon.bbox();
                PolygonEnvelope {
                    index,
                    bounds: [b.min_lon, b.min_lat, b.max_lon, b.max_lat],
                }
            })
            .collect();

        let extent = bbox.width().max(bbox.height()).max(1.0);

        Ok(Self {
            polygons,
            index: RTree::bulk_load(envelopes),
            bbox,
            probe_distance: extent * SEAM_PROBE_SCALE,
        })
    }

    /// Parse a WKT `POLYGON` or `MULTIPOLYGON`.
    pub fn from_wkt(text: &str) -> Result<Self> {
        Self::new(wkt::parse_polygons(text)?)
    }

    /// Parse a GeoJSON geometry, feature or feature collection.
    pub fn from_geojson(text: &str) -> Result<Self> {
        Self::new(geojson::parse_polygons(text)?)
    }

    /// Read every polygon record of an ESRI shapefile.
    pub fn from_shapefile(path: &Path) -> Result<Self> {
        Self::new(shp::read_polygons(path)?)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total bounding box of all polygons.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// `(min_lon, max_lon, min_lat, max_lat)` for display framing.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        self.bbox.extent()
    }

    fn candidates(&self, lon: f64, lat: f64) -> impl Iterator<Item = &Polygon> + '_ {
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point([lon, lat]))
            .map(move |env| &self.polygons[env.index])
    }

    fn locate_parts(&self, lon: f64, lat: f64) -> Location {
        let mut on_boundary = false;
        for polygon in self.candidates(lon, lat) {
            match polygon.locate(lon, lat) {
                Location::Inside => return Location::Inside,
                Location::OnBoundary => on_boundary = true,
                Location::Outside => {}
            }
        }
        if on_boundary {
            Location::OnBoundary
        } else {
            Location::Outside
        }
    }

    /// Classify a point against the union of all polygons.
    ///
    /// A point on the edge of one polygon is still interior to the union
    /// when that edge is shared with a neighbouring polygon, so such
    /// points are resolved by probing a tiny neighbourhood around them.
    pub fn locate(&self, lon: f64, lat: f64) -> Location {
        if !self.bbox.contains(lon, lat) {
            return Location::Outside;
        }

        match self.locate_parts(lon, lat) {
            Location::OnBoundary if self.polygons.len() > 1 => {
                let d = self.probe_distance;
                let covered = SEAM_PROBES.iter().all(|(dx, dy)| {
                    self.locate_parts(lon + dx * d, lat + dy * d) != Location::Outside
                });
                if covered {
                    Location::Inside
                } else {
                    Location::OnBoundary
                }
            }
            location => location,
        }
    }

    /// Containment test against the union under an explicit edge policy.
    pub fn contains(&self, lon: f64, lat: f64, policy: EdgePolicy) -> bool {
        policy.accepts(self.locate(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::from_exterior(vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_boundary_rejected() {
        assert!(matches!(
            RegionBoundary::new(Vec::new()),
            Err(RegionError::EmptyBoundary)
        ));
    }

    #[test]
    fn test_union_of_disjoint_polygons() {
        let boundary = RegionBoundary::new(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]).unwrap();

        assert!(boundary.contains(0.5, 0.5, EdgePolicy::Exclusive));
        assert!(boundary.contains(5.5, 5.5, EdgePolicy::Exclusive));
        assert!(!boundary.contains(3.0, 3.0, EdgePolicy::Inclusive));
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 0.0, 6.0, 6.0));
    }

    #[test]
    fn test_shared_edge_is_interior_of_union() {
        // Two adjacent unit squares sharing the edge x = 1.
        let boundary = RegionBoundary::new(vec![square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)]).unwrap();

        assert_eq!(boundary.locate(1.0, 0.5), Location::Inside);
        assert!(boundary.contains(1.0, 0.5, EdgePolicy::Exclusive));

        // The outer edge of the union is still boundary.
        assert_eq!(boundary.locate(2.0, 0.5), Location::OnBoundary);
        assert_eq!(boundary.locate(1.0, 1.0), Location::OnBoundary);
    }

    #[test]
    fn test_extent_for_display() {
        let boundary = RegionBoundary::new(vec![square(-98.0, 28.0, 0.5)]).unwrap();
        assert_eq!(boundary.extent(), (-98.0, -97.5, 28.0, 28.5));
    }
}
