//! Configuration for regridding and masking.

use region::EdgePolicy;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::InterpolationMethod;

/// Largest grid accepted by [`RegridConfig::validate`].
pub const MAX_GRID_CELLS: usize = 25_000_000;

/// Configuration for the interpolation and masking passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegridConfig {
    /// Grid points along longitude.
    pub nx: usize,

    /// Grid points along latitude.
    pub ny: usize,

    /// Scattered-data interpolation method.
    pub interpolation: InterpolationMethod,

    /// Replace negative interpolated values with 0 inside the region.
    pub clamp_negative: bool,

    /// Treatment of grid cells lying exactly on the region boundary.
    pub grid_edge_policy: EdgePolicy,
}

impl Default for RegridConfig {
    fn default() -> Self {
        Self {
            nx: 200,
            ny: 200,
            interpolation: InterpolationMethod::Linear,
            clamp_negative: true,
            grid_edge_policy: EdgePolicy::Exclusive,
        }
    }
}

impl RegridConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `REGRID_*` environment variables.
    ///
    /// Unset variables leave the field alone; unparseable values are errors.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("REGRID_NX") {
            self.nx = parse_count("REGRID_NX", &val)?;
        }

        if let Ok(val) = std::env::var("REGRID_NY") {
            self.ny = parse_count("REGRID_NY", &val)?;
        }

        if let Ok(val) = std::env::var("REGRID_INTERPOLATION") {
            self.interpolation = InterpolationMethod::parse(&val).ok_or_else(|| {
                GridError::config(format!(
                    "REGRID_INTERPOLATION: unknown method '{}' (expected linear or nearest)",
                    val
                ))
            })?;
        }

        if let Ok(val) = std::env::var("REGRID_CLAMP_NEGATIVE") {
            self.clamp_negative = parse_flag("REGRID_CLAMP_NEGATIVE", &val)?;
        }

        if let Ok(val) = std::env::var("REGRID_EDGE_POLICY") {
            self.grid_edge_policy = EdgePolicy::parse(&val).ok_or_else(|| {
                GridError::config(format!("REGRID_EDGE_POLICY: unknown policy '{}'", val))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(GridError::config(format!(
                "grid resolution must be at least 2x2, got {}x{}",
                self.nx, self.ny
            )));
        }

        match self.nx.checked_mul(self.ny) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
            _ => Err(GridError::config(format!(
                "grid of {}x{} exceeds {} cells",
                self.nx, self.ny, MAX_GRID_CELLS
            ))),
        }
    }
}

fn parse_count(name: &str, val: &str) -> Result<usize> {
    val.trim()
        .parse()
        .map_err(|_| GridError::config(format!("{}: expected a positive integer, got '{}'", name, val)))
}

fn parse_flag(name: &str, val: &str) -> Result<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(GridError::config(format!("{}: expected true or false, got '{}'", name, val))),
    }
}
