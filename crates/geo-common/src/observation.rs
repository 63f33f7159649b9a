//! Observation points and the column-oriented filtered set.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// A single satellite column measurement at a ground position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    /// Column value in the source's native unit.
    pub value: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl ObservationPoint {
    pub fn new(value: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            value,
            latitude,
            longitude,
        }
    }

    /// `(lon, lat)` ordering used by every geometric test.
    pub fn position(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

/// Observations retained by a region filter, stored as parallel columns.
///
/// The three columns can only grow together through [`FilteredPointSet::push`],
/// so they always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredPointSet {
    values: Vec<f64>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

impl FilteredPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation to all three columns.
    pub fn push(&mut self, point: &ObservationPoint) {
        self.values.push(point.value);
        self.latitudes.push(point.latitude);
        self.longitudes.push(point.longitude);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the set back as observation points.
    pub fn iter(&self) -> impl Iterator<Item = ObservationPoint> + '_ {
        self.values
            .iter()
            .zip(&self.latitudes)
            .zip(&self.longitudes)
            .map(|((&value, &latitude), &longitude)| ObservationPoint::new(value, latitude, longitude))
    }

    /// Extent of the retained positions, `None` when the set is empty.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(
            self.longitudes
                .iter()
                .copied()
                .zip(self.latitudes.iter().copied()),
        )
    }
}

impl<'a> FromIterator<&'a ObservationPoint> for FilteredPointSet {
    fn from_iter<T: IntoIterator<Item = &'a ObservationPoint>>(iter: T) -> Self {
        let mut set = FilteredPointSet::new();
        for point in iter {
            set.push(point);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_stay_aligned() {
        let points = vec![
            ObservationPoint::new(1.0, 10.0, 100.0),
            ObservationPoint::new(2.0, 20.0, 200.0),
        ];
        let set: FilteredPointSet = points.iter().collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.values(), &[1.0, 2.0]);
        assert_eq!(set.latitudes(), &[10.0, 20.0]);
        assert_eq!(set.longitudes(), &[100.0, 200.0]);
        assert_eq!(set.iter().collect::<Vec<_>>(), points);
    }

    #[test]
    fn test_empty_set_has_no_bbox() {
        assert!(FilteredPointSet::new().bbox().is_none());
    }
}
