//! Point-level region filtering.

use geo_common::{FilteredPointSet, ObservationPoint};
use tracing::{debug, info};

use crate::boundary::RegionBoundary;
use crate::polygon::EdgePolicy;

/// Keeps only the observations that fall inside a region boundary.
#[derive(Debug, Clone, Copy)]
pub struct RegionFilter<'a> {
    boundary: &'a RegionBoundary,
    policy: EdgePolicy,
}

impl<'a> RegionFilter<'a> {
    pub fn new(boundary: &'a RegionBoundary, policy: EdgePolicy) -> Self {
        Self { boundary, policy }
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Test a single observation.
    pub fn accepts(&self, point: &ObservationPoint) -> bool {
        let (lon, lat) = point.position();
        self.boundary.contains(lon, lat, self.policy)
    }

    /// Reduce a point set to the points inside the boundary.
    ///
    /// Value, latitude and longitude are retained or dropped together.
    pub fn filter(&self, points: &[ObservationPoint]) -> FilteredPointSet {
        let bbox = self.boundary.bbox();
        let mut outside_bbox = 0usize;

        let mut retained = FilteredPointSet::new();
        for point in points {
            if !bbox.contains(point.longitude, point.latitude) {
                outside_bbox += 1;
                continue;
            }
            if self.accepts(point) {
                retained.push(point);
            }
        }

        debug!(
            outside_bbox,
            tested = points.len() - outside_bbox,
            "Bounding-box prefilter"
        );
        info!(
            input = points.len(),
            retained = retained.len(),
            policy = %self.policy,
            "Filtered observations to region"
        );

        retained
    }
}
