//! Merging observation sources into one point list.

use geo_common::ObservationPoint;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::source::{ObservationArrays, ObservationSource};

/// Kept and dropped counts for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub total: usize,
    pub kept: usize,
    /// Observations dropped for a NaN value.
    pub dropped: usize,
}

/// Counts for a whole collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub sources: Vec<SourceSummary>,
    pub total_kept: usize,
    pub total_dropped: usize,
}

/// Flattens observation sources into a single list of valid points.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointCollector;

impl PointCollector {
    pub fn new() -> Self {
        Self
    }

    /// Read every source and concatenate the observations with a value.
    ///
    /// The first source whose arrays disagree in length aborts the run
    /// with [`IngestionError::InputShapeMismatch`](crate::IngestionError).
    /// Points are appended in source order without deduplication; an empty
    /// source list gives an empty result.
    pub fn collect(
        &self,
        sources: &[Box<dyn ObservationSource>],
    ) -> Result<(Vec<ObservationPoint>, CollectionSummary)> {
        let mut points = Vec::new();
        let mut summary = CollectionSummary::default();

        for source in sources {
            debug!(source = %source.name(), "Reading observation source");
            let arrays = source.read()?;
            summary.add(self.append(&arrays, &mut points)?);
        }

        summary.log();
        Ok((points, summary))
    }

    /// [`PointCollector::collect`] over in-memory arrays.
    pub fn collect_arrays(
        &self,
        arrays: &[ObservationArrays],
    ) -> Result<(Vec<ObservationPoint>, CollectionSummary)> {
        let mut points = Vec::new();
        let mut summary = CollectionSummary::default();

        for source in arrays {
            summary.add(self.append(source, &mut points)?);
        }

        summary.log();
        Ok((points, summary))
    }

    fn append(
        &self,
        arrays: &ObservationArrays,
        points: &mut Vec<ObservationPoint>,
    ) -> Result<SourceSummary> {
        arrays.check_shape()?;

        let before = points.len();
        points.extend(
            arrays
                .values
                .iter()
                .zip(&arrays.latitudes)
                .zip(&arrays.longitudes)
                .filter(|((value, _), _)| !value.is_nan())
                .map(|((&value, &lat), &lon)| ObservationPoint::new(value, lat, lon)),
        );

        let kept = points.len() - before;
        let source = SourceSummary {
            name: arrays.name.clone(),
            total: arrays.len(),
            kept,
            dropped: arrays.len() - kept,
        };

        debug!(
            source = %source.name,
            total = source.total,
            kept = source.kept,
            dropped = source.dropped,
            "Collected observations"
        );

        Ok(source)
    }
}

impl CollectionSummary {
    fn add(&mut self, source: SourceSummary) {
        self.total_kept += source.kept;
        self.total_dropped += source.dropped;
        self.sources.push(source);
    }

    fn log(&self) {
        info!(
            sources = self.sources.len(),
            kept = self.total_kept,
            dropped = self.total_dropped,
            "Collected observations from all sources"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IngestionError;

    #[test]
    fn test_nan_values_dropped_with_coordinates() {
        let arrays = ObservationArrays::new(
            "granule",
            vec![1.0, f64::NAN, 3.0],
            vec![10.0, 11.0, 12.0],
            vec![-98.0, -97.0, -96.0],
        );
        let (points, summary) = PointCollector::new().collect_arrays(&[arrays]).unwrap();

        assert_eq!(
            points,
            vec![
                ObservationPoint::new(1.0, 10.0, -98.0),
                ObservationPoint::new(3.0, 12.0, -96.0),
            ]
        );
        assert_eq!(summary.total_kept, 2);
        assert_eq!(summary.total_dropped, 1);
    }

    #[test]
    fn test_sources_are_concatenated_without_dedup() {
        let a = ObservationArrays::new("a", vec![1.0], vec![0.0], vec![0.0]);
        let b = ObservationArrays::new("b", vec![1.0], vec![0.0], vec![0.0]);
        let (points, summary) = PointCollector::new().collect_arrays(&[a, b]).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(summary.sources.len(), 2);
    }

    #[test]
    fn test_empty_source_list() {
        let (points, summary) = PointCollector::new().collect(&[]).unwrap();
        assert!(points.is_empty());
        assert_eq!(summary, CollectionSummary::default());
    }

    #[test]
    fn test_shape_mismatch_names_source() {
        let good = ObservationArrays::new("good.nc", vec![1.0], vec![0.0], vec![0.0]);
        let bad = ObservationArrays::new("bad.nc", vec![1.0, 2.0], vec![0.0, 1.0], vec![0.0]);
        let sources: Vec<Box<dyn ObservationSource>> = vec![Box::new(good), Box::new(bad)];

        match PointCollector::new().collect(&sources) {
            Err(IngestionError::InputShapeMismatch {
                source_name,
                values,
                longitudes,
                ..
            }) => {
                assert_eq!(source_name, "bad.nc");
                assert_eq!(values, 2);
                assert_eq!(longitudes, 1);
            }
            other => panic!("expected shape mismatch, got {:?}", other.map(|(p, _)| p.len())),
        }
    }
}
