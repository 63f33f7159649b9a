//! Pipeline configuration.
//!
//! Loaded from YAML with `${VAR}` and `${VAR:-default}` substitution,
//! then overridden from `REGRID_*` environment variables.
//!
//! ```yaml
//! data:
//!   dir: data/tempo
//!   extension: nc
//! regions:
//!   karnes_county:
//!     format: geojson_file
//!     path: shapes/karnes.geojson
//! selected_region: karnes_county
//! regrid:
//!   nx: 200
//!   ny: 200
//!   interpolation: linear
//! output: out/karnes_no2.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use grid_processor::RegridConfig;
use region::{BoundaryCatalog, EdgePolicy};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Where the granules come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory scanned for granules.
    pub dir: Option<PathBuf>,
    /// Explicit granule files, read after the directory listing.
    pub files: Vec<PathBuf>,
    /// Granule file extension, without the dot.
    pub extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: None,
            files: Vec::new(),
            extension: "nc".to_string(),
        }
    }
}

impl DataConfig {
    pub fn is_empty(&self) -> bool {
        self.dir.is_none() && self.files.is_empty()
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub data: DataConfig,

    /// Named boundary options.
    pub regions: BoundaryCatalog,

    /// Name of the boundary option to map.
    pub selected_region: String,

    /// Treatment of observations lying exactly on the region boundary.
    #[serde(default = "default_point_edge_policy")]
    pub point_edge_policy: EdgePolicy,

    #[serde(default)]
    pub regrid: RegridConfig,

    /// Where the driver writes the raster.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_point_edge_policy() -> EdgePolicy {
    EdgePolicy::Inclusive
}

impl PipelineConfig {
    /// Config for a single in-memory catalog, with default regridding.
    pub fn new(regions: BoundaryCatalog, selected_region: impl Into<String>) -> Self {
        Self {
            data: DataConfig::default(),
            regions,
            selected_region: selected_region.into(),
            point_edge_policy: default_point_edge_policy(),
            regrid: RegridConfig::default(),
            output: None,
        }
    }

    /// Load a YAML config file.
    ///
    /// Relative paths inside the file (data directory, granule files,
    /// boundary files, output) are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&content).map_err(|err| match err {
            PipelineError::ConfigParse { source, .. } => PipelineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Parse YAML text, expanding environment variables first.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        serde_yaml::from_str(&expanded).map_err(|source| PipelineError::ConfigParse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Apply `REGRID_*` environment overrides to the regrid section.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.regrid
            .apply_env_overrides()
            .map_err(|e| PipelineError::invalid_config(e.to_string()))
    }

    /// Validate the configuration.
    ///
    /// Whether the selected region exists is checked when the boundary is
    /// resolved, so the error can list the available names.
    pub fn validate(&self) -> Result<()> {
        if self.selected_region.trim().is_empty() {
            return Err(PipelineError::invalid_config("selected_region cannot be empty"));
        }

        if self.regions.is_empty() {
            return Err(PipelineError::invalid_config(
                "at least one boundary must be defined under regions",
            ));
        }

        if self.data.extension.trim_start_matches('.').is_empty() {
            return Err(PipelineError::invalid_config("data.extension cannot be empty"));
        }

        self.regrid
            .validate()
            .map_err(|e| PipelineError::invalid_config(e.to_string()))
    }

    fn resolve_relative(&mut self, base: &Path) {
        let join = |p: &PathBuf| if p.is_relative() { base.join(p) } else { p.clone() };

        self.data.dir = self.data.dir.as_ref().map(join);
        self.data.files = self.data.files.iter().map(join).collect();
        self.output = self.output.as_ref().map(join);

        let mut regions = BoundaryCatalog::new();
        for name in self.regions.names() {
            if let Ok(source) = self.regions.get(&name) {
                regions.insert(name.clone(), source.resolve_relative(base));
            }
        }
        self.regions = regions;
    }
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => {
                        return Err(PipelineError::invalid_config(format!(
                            "Unclosed variable substitution: ${{{}",
                            var_expr
                        )))
                    }
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).map_err(|_| {
            PipelineError::invalid_config(format!("Environment variable {} not set", expr.trim()))
        })
    }
}
