use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Terminator, Writer, WriterBuilder};
use price_outlier_core::{ReportRow, REPORT_HEADER};

pub struct CsvStorage;

impl CsvStorage {
    /// Writes an outlier report to `path`, replacing any previous report.
    ///
    /// Format: header line, then one
    /// `ticker,date,price,mean,deviation,percent` row per outlier.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        Self::write_rows(file, rows)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))
    }

    /// Renders an outlier report as a string.
    ///
    /// # Errors
    /// Returns error if a row cannot be encoded
    pub fn render_report(rows: &[ReportRow]) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write_rows(&mut buffer, rows)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn write_rows<W: Write>(out: W, rows: &[ReportRow]) -> Result<()> {
        let mut writer = Self::writer(out);

        writer.write_record(REPORT_HEADER)?;
        for row in rows {
            writer.write_record(row.to_record())?;
        }

        writer.flush()?;
        Ok(())
    }

    fn writer<W: Write>(out: W) -> Writer<W> {
        WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const HEADER_LINE: &str = "Stock-ID, Timestamp, Stock Price, Mean of 30 data points, Stock Price - Mean, % deviation above the threshold\n";

    fn row(ticker: &str, day: u32, price: f64) -> ReportRow {
        ReportRow {
            ticker: ticker.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 9, day).unwrap(),
            price,
            mean: 100.0,
            deviation: price - 100.0,
            percent_deviation: 12.5,
        }
    }

    #[test]
    fn empty_report_is_header_only() {
        assert_eq!(CsvStorage::render_report(&[]).unwrap(), HEADER_LINE);
    }

    #[test]
    fn rows_follow_header() {
        let rendered =
            CsvStorage::render_report(&[row("FLTR", 3, 150.5), row("FLTR", 9, 40.0)]).unwrap();
        let expected = format!(
            "{HEADER_LINE}FLTR,03-09-2023,150.5,100.00,50.50,12.50%\nFLTR,09-09-2023,40.0,100.00,-60.00,12.50%\n"
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn write_report_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FLTR_outliers.csv");
        std::fs::write(&path, "stale contents\nmore\n").unwrap();

        CsvStorage::write_report(&path, &[row("FLTR", 1, 130.0)]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(HEADER_LINE));
        assert_eq!(written.lines().count(), 2);
        assert!(!written.contains("stale"));
    }

    #[test]
    fn write_report_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("FLTR_outliers.csv");
        assert!(CsvStorage::write_report(&path, &[]).is_err());
    }
}
