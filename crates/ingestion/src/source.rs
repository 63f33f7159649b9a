//! Observation sources.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{IngestionError, Result};

/// Co-indexed measurement arrays from one source.
///
/// Index `k` of each array describes the same observation. Arrays read
/// from a 2-D granule are flattened in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationArrays {
    /// Name used in logs and error messages (usually the file name).
    pub name: String,
    pub values: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl ObservationArrays {
    pub fn new(
        name: impl Into<String>,
        values: Vec<f64>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            values,
            latitudes,
            longitudes,
        }
    }

    /// Fail unless all three arrays have the same length.
    pub fn check_shape(&self) -> Result<()> {
        let n = self.values.len();
        if self.latitudes.len() != n || self.longitudes.len() != n {
            return Err(IngestionError::shape_mismatch(
                &self.name,
                n,
                self.latitudes.len(),
                self.longitudes.len(),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A source of flat observation arrays.
pub trait ObservationSource: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Read the value, latitude and longitude arrays.
    fn read(&self) -> Result<ObservationArrays>;
}

impl ObservationSource for ObservationArrays {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<ObservationArrays> {
        Ok(self.clone())
    }
}

/// Files under `dir` with the given extension, sorted by path.
///
/// Only the top level of `dir` is scanned. The extension is compared
/// case-insensitively and given without the leading dot (`"nc"`).
pub fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.').to_lowercase();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| IngestionError::Discovery {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == wanted)
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(dir = %dir.display(), extension = %wanted, count = files.len(), "Discovered source files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_shape() {
        let ok = ObservationArrays::new("ok", vec![1.0, 2.0], vec![0.0, 1.0], vec![0.0, 1.0]);
        assert!(ok.check_shape().is_ok());

        let bad = ObservationArrays::new("granule_07.nc", vec![1.0, 2.0], vec![0.0], vec![0.0, 1.0]);
        let err = bad.check_shape().unwrap_err();
        assert!(err.to_string().contains("granule_07.nc"));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.nc", "a.NC", "c.txt", "d.nc4"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.nc")).unwrap();

        let files = discover_sources(dir.path(), ".nc").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.NC", "b.nc"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let result = discover_sources(Path::new("/nonexistent/tempo"), "nc");
        assert!(matches!(result, Err(IngestionError::Discovery { .. })));
    }
}
