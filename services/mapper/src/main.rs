//! TEMPO mapper
//!
//! Regrids TEMPO Level-2 trace-gas columns onto a masked lat/lon grid for
//! one study region and writes the result as JSON.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use tempo_mapper::Args;

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = tempo_mapper::run(&args) {
        if let Some(pipeline_error) = e.downcast_ref::<pipeline::PipelineError>() {
            error!(
                stage = %pipeline_error.stage(),
                kind = ?pipeline_error.kind(),
                "Pipeline failed: {:#}",
                e
            );
        } else {
            error!("Mapper failed: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
