//! Batch command: walk every exchange under the data root and write one
//! outlier report per processed ticker.
//!
//! Tickers are handled one at a time. A failing ticker is logged and
//! counted; it never aborts the batch.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use price_outlier_core::OutlierService;
use price_outlier_data::{CsvStorage, PriceFileStore};

use super::{load_config, ConfigArgs};

/// Arguments for the process command.
#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Maximum number of stocks to process per exchange
    pub count: usize,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Outcome counts of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// True when no ticker was attempted at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succeeded == 0 && self.failed == 0
    }

    fn merge(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

pub fn run_process(args: &ProcessArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    tracing::info!(
        "Processing up to {} stocks per exchange under {}",
        args.count,
        config.data.root_dir.display()
    );

    let store = PriceFileStore::new(&config.data.root_dir);
    let service = OutlierService::new(&config.analysis);

    let summary = process_exchanges(&store, &service, args.count)?;
    if summary.is_empty() {
        bail!("No stocks to process");
    }

    println!(
        "Processed {} stocks successfully and {} with errors",
        summary.succeeded, summary.failed
    );
    Ok(())
}

/// Processes at most `count` tickers of every exchange, in name order.
///
/// # Errors
/// Returns error if the data root or an exchange directory cannot be listed
pub fn process_exchanges(
    store: &PriceFileStore,
    service: &OutlierService,
    count: usize,
) -> Result<BatchSummary> {
    let exchanges = store
        .exchanges()
        .with_context(|| format!("Failed to list exchanges in {}", store.root().display()))?;

    let mut summary = BatchSummary::default();
    for exchange in exchanges {
        summary.merge(process_exchange(store, service, &exchange, count)?);
    }
    Ok(summary)
}

fn process_exchange(
    store: &PriceFileStore,
    service: &OutlierService,
    exchange: &str,
    count: usize,
) -> Result<BatchSummary> {
    let tickers = store
        .tickers(exchange)
        .with_context(|| format!("Failed to list stocks of exchange {exchange}"))?;

    let mut summary = BatchSummary::default();
    for ticker in tickers.iter().take(count) {
        tracing::info!("Processing stock {} from exchange {}", ticker, exchange);
        match process_stock(store, service, exchange, ticker) {
            Ok((path, outliers)) => {
                tracing::info!(
                    " - Result: Found {} outliers. Output file: {}",
                    outliers,
                    path.display()
                );
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "Error processing stock {} from exchange {}: {:#}",
                    ticker,
                    exchange,
                    e
                );
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Runs the pipeline for one ticker and writes its report next to the input.
fn process_stock(
    store: &PriceFileStore,
    service: &OutlierService,
    exchange: &str,
    ticker: &str,
) -> Result<(PathBuf, usize)> {
    let lines = store.read_ticker(exchange, ticker)?;
    let output = service.process(ticker, &lines)?;

    let path = store.report_path(exchange, ticker);
    CsvStorage::write_report(&path, &output.rows)?;
    Ok((path, output.rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_outlier_core::AnalysisConfig;
    use std::fs;
    use tempfile::TempDir;

    const HEADER_LINE: &str = "Stock-ID, Timestamp, Stock Price, Mean of 30 data points, Stock Price - Mean, % deviation above the threshold";

    fn write_file(root: &TempDir, relative: &str, contents: &str) {
        let path = root.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn prices(ticker: &str, values: &[f64]) -> String {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{ticker},{:02}-03-2023,{v}\n", i + 1))
            .collect()
    }

    fn service() -> OutlierService {
        OutlierService::new(&AnalysisConfig {
            seed: Some(99),
            ..AnalysisConfig::default()
        })
    }

    #[test]
    fn writes_report_for_each_ticker() {
        let root = TempDir::new().unwrap();
        let mut spiky = vec![20.0; 30];
        spiky[29] = 80.0;
        write_file(&root, "NYSE/ASH.csv", &prices("ASH", &spiky));
        write_file(&root, "LSE/FLAT.csv", &prices("FLAT", &[5.0; 30]));

        let store = PriceFileStore::new(root.path());
        let summary = process_exchanges(&store, &service(), 10).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                succeeded: 2,
                failed: 0
            }
        );

        let ash = fs::read_to_string(root.path().join("NYSE/ASH_outliers.csv")).unwrap();
        let lines: Vec<&str> = ash.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER_LINE);
        assert!(lines[1].starts_with("ASH,30-03-2023,80.0,22.00,58.00,"), "{}", lines[1]);

        let flat = fs::read_to_string(root.path().join("LSE/FLAT_outliers.csv")).unwrap();
        assert_eq!(flat, format!("{HEADER_LINE}\n"));
    }

    #[test]
    fn honours_per_exchange_count_and_skips_reports() {
        let root = TempDir::new().unwrap();
        for ticker in ["AAA", "BBB", "CCC"] {
            write_file(&root, &format!("LSE/{ticker}.csv"), &prices(ticker, &[1.0; 30]));
        }
        write_file(&root, "LSE/AAA_outliers.csv", "old report\n");

        let store = PriceFileStore::new(root.path());
        let summary = process_exchanges(&store, &service(), 2).unwrap();

        assert_eq!(summary.succeeded, 2);
        assert!(root.path().join("LSE/BBB_outliers.csv").exists());
        assert!(!root.path().join("LSE/CCC_outliers.csv").exists());
        assert!(!root.path().join("LSE/AAA_outliers_outliers.csv").exists());
    }

    #[test]
    fn bad_files_are_counted_not_fatal() {
        let root = TempDir::new().unwrap();
        write_file(&root, "LSE/GOOD.csv", &prices("GOOD", &[3.0; 30]));
        write_file(&root, "LSE/SHORT.csv", &prices("SHORT", &[3.0; 4]));
        write_file(&root, "LSE/BROKEN.csv", "BROKEN;01-01-2023;3.0\n");

        let store = PriceFileStore::new(root.path());
        let summary = process_exchanges(&store, &service(), 10).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                succeeded: 1,
                failed: 2
            }
        );
        assert!(!root.path().join("LSE/SHORT_outliers.csv").exists());
    }

    #[test]
    fn empty_root_processes_nothing() {
        let root = TempDir::new().unwrap();
        let store = PriceFileStore::new(root.path());
        let summary = process_exchanges(&store, &service(), 5).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn zero_count_processes_nothing() {
        let root = TempDir::new().unwrap();
        write_file(&root, "LSE/GOOD.csv", &prices("GOOD", &[3.0; 30]));
        let store = PriceFileStore::new(root.path());
        assert!(process_exchanges(&store, &service(), 0).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = TempDir::new().unwrap();
        let store = PriceFileStore::new(root.path().join("absent"));
        assert!(process_exchanges(&store, &service(), 5).is_err());
    }
}
