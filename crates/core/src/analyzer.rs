//! Population statistics and two-sigma outlier classification.

use crate::error::{OutlierError, Result};
use crate::types::{Analysis, Statistics};

/// Default distance from the mean, in standard deviations, beyond which a
/// value is an outlier.
pub const DEFAULT_THRESHOLD_SIGMAS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierAnalyzer {
    threshold_sigmas: f64,
}

impl Default for OutlierAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_SIGMAS)
    }
}

impl OutlierAnalyzer {
    #[must_use]
    pub const fn new(threshold_sigmas: f64) -> Self {
        Self { threshold_sigmas }
    }

    #[must_use]
    pub const fn threshold_sigmas(&self) -> f64 {
        self.threshold_sigmas
    }

    /// Computes mean and population standard deviation of `values` and
    /// returns the indices whose distance from the mean strictly exceeds
    /// `threshold_sigmas * std_dev`.
    ///
    /// A zero standard deviation yields no outliers.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::EmptyInput`] if `values` is empty.
    pub fn analyze(&self, values: &[f64]) -> Result<Analysis> {
        let mean = mean(values)?;
        let std_dev = population_std_dev_with_mean(values, mean);
        let limit = self.threshold_sigmas * std_dev;

        let outliers = values
            .iter()
            .enumerate()
            .filter(|(_, v)| is_outlier(**v, mean, limit))
            .map(|(i, _)| i)
            .collect();

        Ok(Analysis {
            outliers,
            statistics: Statistics { mean, std_dev },
        })
    }
}

fn is_outlier(value: f64, mean: f64, limit: f64) -> bool {
    (value - mean).abs() > limit
}

/// Arithmetic mean.
///
/// # Errors
///
/// Returns [`OutlierError::EmptyInput`] if `values` is empty.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(OutlierError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation dividing by N (no Bessel correction).
///
/// # Errors
///
/// Returns [`OutlierError::EmptyInput`] if `values` is empty.
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    Ok(population_std_dev_with_mean(values, mean))
}

fn population_std_dev_with_mean(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
