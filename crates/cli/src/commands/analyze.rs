//! Single-file command: run the pipeline over one price file and print the
//! report to stdout, or write it to `--output`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use price_outlier_core::OutlierService;
use price_outlier_data::{CsvStorage, PriceFileStore};

use super::{load_config, ConfigArgs};

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Price file with `ticker,dd-mm-yyyy,price` lines
    pub file: PathBuf,

    /// Ticker written into the report (defaults to the file name without extension)
    #[arg(long)]
    pub ticker: Option<String>,

    /// Write the report to this path instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let ticker = match &args.ticker {
        Some(ticker) => ticker.clone(),
        None => ticker_from_path(&args.file)?,
    };

    let lines = PriceFileStore::read_file(&args.file)?;
    let output = OutlierService::new(&config.analysis)
        .process(&ticker, &lines)
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;

    tracing::info!(
        "{}: window starting {} has mean {:.2}, std dev {:.2}, {} outliers",
        ticker,
        output.window.timestamp(),
        output.analysis.mean(),
        output.analysis.std_dev(),
        output.rows.len()
    );

    match &args.output {
        Some(path) => {
            CsvStorage::write_report(path, &output.rows)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", CsvStorage::render_report(&output.rows)?),
    }
    Ok(())
}

fn ticker_from_path(path: &std::path::Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a ticker from {}", path.display()))
}
