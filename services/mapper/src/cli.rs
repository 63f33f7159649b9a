//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use pipeline::PipelineConfig;

/// TEMPO trace-gas mapper
#[derive(Parser, Debug, Clone)]
#[command(name = "tempo-mapper")]
#[command(about = "Regrid TEMPO trace-gas columns onto a masked grid for a study region")]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/tempo.yaml", env = "TEMPO_CONFIG")]
    pub config: PathBuf,

    /// Boundary option to map (overrides `selected_region`)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Grid points along longitude
    #[arg(long)]
    pub nx: Option<usize>,

    /// Grid points along latitude
    #[arg(long)]
    pub ny: Option<usize>,

    /// Output JSON path (overrides `output`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Apply command-line overrides to a loaded config.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(region) = &self.region {
            config.selected_region = region.clone();
        }
        if let Some(nx) = self.nx {
            config.regrid.nx = nx;
        }
        if let Some(ny) = self.ny {
            config.regrid.ny = ny;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
    }
}
