//! Raster output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pipeline::RegionRaster;

/// Write `raster` as pretty JSON, creating parent directories as needed.
pub fn write_raster(path: &Path, raster: &RegionRaster) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let json = raster.to_json().context("Failed to serialise raster")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
