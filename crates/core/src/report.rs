//! Report rows for detected outliers.
//!
//! Each outlier index becomes one row whose date is recovered by offsetting
//! the window's first date. The percent figure carries a fixed offset:
//! negative raw percentages gain 200, all others lose 200. Existing report
//! consumers expect this offset.
//!
//! Deviation and percent are derived from the mean and standard deviation
//! rounded to two decimals, exactly as the statistics are published.

use chrono::Days;

use crate::error::{OutlierError, Result};
use crate::types::{Analysis, ReportRow, Window};

/// Column titles written at the top of every report file.
pub const REPORT_HEADER: [&str; 6] = [
    "Stock-ID",
    " Timestamp",
    " Stock Price",
    " Mean of 30 data points",
    " Stock Price - Mean",
    " % deviation above the threshold",
];

const PERCENT_OFFSET: f64 = 200.0;

pub struct ReportBuilder;

impl ReportBuilder {
    /// Builds one row per outlier, in ascending index order.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::DivisionGuard`] if an outlier is reported
    /// against a standard deviation that rounds to zero,
    /// [`OutlierError::DateOutOfRange`] if a derived date cannot be
    /// represented, and [`OutlierError::Format`] if an index falls outside
    /// the window.
    pub fn build(ticker: &str, window: &Window, analysis: &Analysis) -> Result<Vec<ReportRow>> {
        let mean = round_to_cents(analysis.mean());
        let std_dev = round_to_cents(analysis.std_dev());

        analysis
            .outliers
            .iter()
            .map(|&index| {
                let price = *window.prices.get(index).ok_or_else(|| {
                    OutlierError::format(format!(
                        "outlier index {index} outside window of {} prices",
                        window.len()
                    ))
                })?;

                let date = window
                    .first_date
                    .checked_add_days(Days::new(index as u64))
                    .ok_or_else(|| {
                        OutlierError::DateOutOfRange(format!(
                            "{} + {index} days",
                            window.timestamp()
                        ))
                    })?;

                let deviation = price - mean;

                Ok(ReportRow {
                    ticker: ticker.to_string(),
                    date,
                    price,
                    mean,
                    deviation,
                    percent_deviation: percent_deviation(deviation, std_dev)?,
                })
            })
            .collect()
    }
}

/// Rounds to two decimals the way `{:.2}` renders the value.
fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Deviation as a percentage of the standard deviation, offset by 200.
///
/// # Errors
///
/// Returns [`OutlierError::DivisionGuard`] if `std_dev` is zero.
pub fn percent_deviation(deviation: f64, std_dev: f64) -> Result<f64> {
    if std_dev == 0.0 {
        return Err(OutlierError::DivisionGuard);
    }

    let raw = deviation / std_dev * 100.0;
    if raw < 0.0 {
        Ok(raw + PERCENT_OFFSET)
    } else {
        Ok(raw - PERCENT_OFFSET)
    }
}
