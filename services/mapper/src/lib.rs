//! TEMPO mapper driver.
//!
//! Loads a pipeline config, applies command-line and environment
//! overrides, runs the pipeline over the configured granules and writes
//! the masked raster as JSON.

pub mod cli;
pub mod output;

use anyhow::{Context, Result};
use tracing::info;

use pipeline::{Pipeline, PipelineConfig};

pub use cli::Args;
pub use output::write_raster;

/// Load the config named by `args` and apply every override.
///
/// Precedence, lowest first: YAML file, `REGRID_*` environment
/// variables, command-line flags.
pub fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    config
        .apply_env_overrides()
        .context("Invalid REGRID_* environment override")?;
    args.apply_overrides(&mut config);

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the pipeline and write its raster.
pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    info!(
        region = %config.selected_region,
        nx = config.regrid.nx,
        ny = config.regrid.ny,
        interpolation = %config.regrid.interpolation,
        "Loaded configuration"
    );

    let output_path = config
        .output
        .clone()
        .context("No output path: set `output` in the config or pass --output")?;

    let pipeline = Pipeline::new(config)?;

    // Resolve the boundary before touching any granule.
    let boundary = pipeline.resolve_region()?;
    let sources = pipeline.configured_sources()?;
    let result = pipeline.run_with_boundary(&boundary, &sources)?;

    write_raster(&output_path, &result.raster)?;
    info!(
        path = %output_path.display(),
        valid_cells = result.mask.valid,
        "Wrote raster"
    );

    Ok(())
}
