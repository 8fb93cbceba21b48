use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::OutlierError;

/// Day-month-year layout used by input files and reports.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One `ticker,date,price` line of an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub price: f64,
}

impl FromStr for RawRecord {
    type Err = OutlierError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
        if fields.len() != 3 {
            return Err(OutlierError::format(format!(
                "expected 3 comma-separated fields, found {}",
                fields.len()
            )));
        }

        let date = NaiveDate::parse_from_str(fields[1], DATE_FORMAT).map_err(|_| {
            OutlierError::format(format!(
                "invalid timestamp '{}', expected dd-mm-yyyy",
                fields[1]
            ))
        })?;

        let price: f64 = fields[2]
            .trim()
            .parse()
            .map_err(|_| OutlierError::format(format!("invalid stock price '{}'", fields[2])))?;
        if !price.is_finite() {
            return Err(OutlierError::format(format!(
                "stock price '{}' is not a finite number",
                fields[2]
            )));
        }

        Ok(Self {
            ticker: fields[0].to_string(),
            date,
            price,
        })
    }
}

/// Contiguous slice of prices used as the statistical sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub prices: Vec<f64>,
    pub first_date: NaiveDate,
}

impl Window {
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// First date rendered as `dd-mm-yyyy`.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.first_date.format(DATE_FORMAT).to_string()
    }
}

/// Population mean and standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub std_dev: f64,
}

/// Outlier indices (ascending) together with the statistics they were
/// classified against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub outliers: Vec<usize>,
    pub statistics: Statistics,
}

impl Analysis {
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.statistics.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.statistics.std_dev
    }
}

/// One line of an outlier report.
///
/// `percent_deviation` already has the ±200 offset applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub price: f64,
    pub mean: f64,
    pub deviation: f64,
    pub percent_deviation: f64,
}

impl ReportRow {
    /// Renders the row as report fields, in column order.
    #[must_use]
    pub fn to_record(&self) -> [String; 6] {
        [
            self.ticker.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            format_price(self.price),
            format!("{:.2}", self.mean),
            format!("{:.2}", self.deviation),
            format!("{:.2}%", self.percent_deviation),
        ]
    }
}

/// Shortest round-trip rendering that always keeps a decimal point,
/// so `100` prints as `100.0`.
///
/// Very large or small prices use exponent form with a signed exponent of
/// at least two digits (`1e+16`, `1.5e-05`).
#[must_use]
pub fn format_price(price: f64) -> String {
    let rendered = format!("{price:?}");
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}
