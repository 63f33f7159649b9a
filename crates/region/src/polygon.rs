//! Planar polygons and ring containment.

use geo_common::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

/// How positions lying exactly on a polygon edge or vertex are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// On-edge positions count as inside.
    Inclusive,
    /// On-edge positions count as outside.
    Exclusive,
}

impl EdgePolicy {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inclusive" | "intersects" => Some(Self::Inclusive),
            "exclusive" | "within" => Some(Self::Exclusive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Exclusive => "exclusive",
        }
    }

    /// Resolve a location to a yes/no answer under this policy.
    pub fn accepts(&self, location: Location) -> bool {
        match location {
            Location::Inside => true,
            Location::OnBoundary => *self == Self::Inclusive,
            Location::Outside => false,
        }
    }
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a point relative to a closed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    OnBoundary,
    Outside,
}

/// A closed ring of `(lon, lat)` vertices.
///
/// Stored without the repeated closing vertex; the edge from the last
/// vertex back to the first is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<(f64, f64)>,
    bbox: BoundingBox,
}

impl Ring {
    /// Build a ring, dropping an explicit closing vertex if present.
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices
            .iter()
            .any(|(lon, lat)| !lon.is_finite() || !lat.is_finite())
        {
            return Err(RegionError::InvalidRing(
                "ring contains non-finite coordinates".to_string(),
            ));
        }

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(RegionError::InvalidRing(format!(
                "ring needs at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }

        let bbox = BoundingBox::from_positions(vertices.iter().copied())
            .ok_or_else(|| RegionError::InvalidRing("empty ring".to_string()))?;

        Ok(Self { vertices, bbox })
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Classify a point against this ring.
    ///
    /// On-edge detection is exact: the point must be collinear with an edge
    /// (zero cross product) and within the edge's extent. Otherwise the
    /// even-odd ray casting rule decides.
    pub fn locate(&self, lon: f64, lat: f64) -> Location {
        if !self.bbox.contains(lon, lat) {
            return Location::Outside;
        }

        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];

            if on_segment((xj, yj), (xi, yi), (lon, lat)) {
                return Location::OnBoundary;
            }

            if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }

        if inside {
            Location::Inside
        } else {
            Location::Outside
        }
    }

}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    cross == 0.0
        && p.0 >= a.0.min(b.0)
        && p.0 <= a.0.max(b.0)
        && p.1 >= a.1.min(b.1)
        && p.1 <= a.1.max(b.1)
}

/// A polygon: one exterior ring and zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Build a hole-free polygon from exterior vertices.
    pub fn from_exterior(vertices: Vec<(f64, f64)>) -> Result<Self> {
        Ok(Self::new(Ring::new(vertices)?, Vec::new()))
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    pub fn bbox(&self) -> BoundingBox {
        self.exterior.bbox()
    }

    /// Classify a point against the polygon; hole edges are boundary too.
    pub fn locate(&self, lon: f64, lat: f64) -> Location {
        match self.exterior.locate(lon, lat) {
            Location::Outside => Location::Outside,
            Location::OnBoundary => Location::OnBoundary,
            Location::Inside => {
                for hole in &self.holes {
                    match hole.locate(lon, lat) {
                        Location::Inside => return Location::Outside,
                        Location::OnBoundary => return Location::OnBoundary,
                        Location::Outside => {}
                    }
                }
                Location::Inside
            }
        }
    }

    pub fn contains(&self, lon: f64, lat: f64, policy: EdgePolicy) -> bool {
        policy.accepts(self.locate(lon, lat))
    }
}
