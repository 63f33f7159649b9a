//! Named boundary options.
//!
//! A catalog maps study-region names (e.g. `karnes_county`) to the source
//! their polygons are loaded from. Selecting a name that is not in the
//! catalog fails with [`RegionError::RegionNotFound`] before any data is
//! read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::boundary::RegionBoundary;
use crate::error::{RegionError, Result};

/// Where the polygons of one boundary option come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum BoundarySource {
    /// Inline WKT text.
    Wkt { wkt: String },
    /// A file containing WKT text.
    WktFile { path: PathBuf },
    /// A GeoJSON file (geometry, feature or feature collection).
    #[serde(rename = "geojson_file")]
    GeoJsonFile { path: PathBuf },
    /// An ESRI shapefile (`.shp`) in geographic coordinates.
    Shapefile { path: PathBuf },
}

impl BoundarySource {
    /// Load and union the polygons of this source.
    pub fn load(&self) -> Result<RegionBoundary> {
        match self {
            BoundarySource::Wkt { wkt } => RegionBoundary::from_wkt(wkt),
            BoundarySource::WktFile { path } => RegionBoundary::from_wkt(&read(path)?),
            BoundarySource::GeoJsonFile { path } => RegionBoundary::from_geojson(&read(path)?),
            BoundarySource::Shapefile { path } => RegionBoundary::from_shapefile(path),
        }
    }

    /// Resolve relative file paths against `base`.
    pub fn resolve_relative(&self, base: &Path) -> BoundarySource {
        match self {
            BoundarySource::WktFile { path } if path.is_relative() => BoundarySource::WktFile {
                path: base.join(path),
            },
            BoundarySource::GeoJsonFile { path } if path.is_relative() => {
                BoundarySource::GeoJsonFile {
                    path: base.join(path),
                }
            }
            BoundarySource::Shapefile { path } if path.is_relative() => BoundarySource::Shapefile {
                path: base.join(path),
            },
            other => other.clone(),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RegionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Named boundary options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryCatalog {
    options: BTreeMap<String, BoundarySource>,
}

impl BoundaryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named option.
    pub fn insert(&mut self, name: impl Into<String>, source: BoundarySource) {
        self.options.insert(name.into(), source);
    }

    /// Builder form of [`BoundaryCatalog::insert`].
    pub fn with_option(mut self, name: impl Into<String>, source: BoundarySource) -> Self {
        self.insert(name, source);
        self
    }

    /// Available option names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Look up the source registered under `name`.
    pub fn get(&self, name: &str) -> Result<&BoundarySource> {
        self.options
            .get(name)
            .ok_or_else(|| RegionError::RegionNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Load the boundary registered under `name`.
    pub fn load(&self, name: &str) -> Result<RegionBoundary> {
        let source = self.get(name)?;
        let boundary = source.load()?;

        let bbox = boundary.bbox();
        info!(
            region = %name,
            polygons = boundary.len(),
            min_lon = bbox.min_lon,
            max_lon = bbox.max_lon,
            min_lat = bbox.min_lat,
            max_lat = bbox.max_lat,
            "Loaded region boundary"
        );

        Ok(boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BoundaryCatalog {
        BoundaryCatalog::new().with_option(
            "unit_square",
            BoundarySource::Wkt {
                wkt: "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))".to_string(),
            },
        )
    }

    #[test]
    fn test_load_known_region() {
        let boundary = catalog().load("unit_square").unwrap();
        assert_eq!(boundary.len(), 1);
    }

    #[test]
    fn test_unknown_region() {
        let err = catalog().load("karnes_county").unwrap_err();
        match &err {
            RegionError::RegionNotFound { name, available } => {
                assert_eq!(name, "karnes_county");
                assert_eq!(available, &vec!["unit_square".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("available: unit_square"));
    }

    #[test]
    fn test_missing_file() {
        let catalog = BoundaryCatalog::new().with_option(
            "missing",
            BoundarySource::GeoJsonFile {
                path: PathBuf::from("/nonexistent/boundary.geojson"),
            },
        );
        assert!(matches!(catalog.load("missing"), Err(RegionError::Io { .. })));
    }

    #[test]
    fn test_shapefile_option_from_yaml_tag() {
        let source: BoundarySource =
            serde_json::from_str(r#"{"format": "shapefile", "path": "shapefiles/karnes_county.shp"}"#)
                .unwrap();
        assert_eq!(
            source.resolve_relative(Path::new("/data")),
            BoundarySource::Shapefile {
                path: PathBuf::from("/data/shapefiles/karnes_county.shp")
            }
        );
    }

    #[test]
    fn test_resolve_relative() {
        let source = BoundarySource::GeoJsonFile {
            path: PathBuf::from("shapes/efs.geojson"),
        };
        let resolved = source.resolve_relative(Path::new("/data"));
        assert_eq!(
            resolved,
            BoundarySource::GeoJsonFile {
                path: PathBuf::from("/data/shapes/efs.geojson")
            }
        );
    }
}
