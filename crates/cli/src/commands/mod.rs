//! CLI commands for the outlier pipeline.

pub mod analyze;
pub mod process;
pub mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use price_outlier_core::{AppConfig, ConfigLoader};

pub use analyze::{run_analyze, AnalyzeArgs};
pub use process::{run_process, ProcessArgs};
pub use server::{run_server, ServerArgs};

/// Configuration flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: PathBuf,

    /// Directory with one sub-directory of price files per exchange (overrides config)
    #[arg(long, env = "PRICE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed for reproducible window selection (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Loads configuration and applies command-line overrides.
pub fn load_config(args: &ConfigArgs) -> Result<AppConfig> {
    let mut config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(dir) = &args.data_dir {
        config.data.root_dir = dir.clone();
    }
    if args.seed.is_some() {
        config.analysis.seed = args.seed;
    }
    Ok(config)
}
