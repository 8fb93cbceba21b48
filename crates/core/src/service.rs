//! Pipeline facade shared by the HTTP front end and the CLI.
//!
//! The service owns the one process-wide random source used for window
//! selection. Everything else is recomputed from its inputs on every call.

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::analyzer::OutlierAnalyzer;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::report::ReportBuilder;
use crate::sampler::Sampler;
use crate::types::{Analysis, ReportRow, Window};

/// Everything produced by one run of the pipeline over a price file.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub window: Window,
    pub analysis: Analysis,
    pub rows: Vec<ReportRow>,
}

pub struct OutlierService {
    sampler: Sampler,
    analyzer: OutlierAnalyzer,
    rng: Mutex<ChaCha8Rng>,
}

impl OutlierService {
    /// Builds a service from analysis settings, seeding the sampler from
    /// `config.seed` or from OS entropy.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    #[must_use]
    pub fn with_rng(config: &AnalysisConfig, rng: ChaCha8Rng) -> Self {
        Self {
            sampler: Sampler::new(config.window_size),
            analyzer: OutlierAnalyzer::new(config.threshold_sigmas),
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub const fn analyzer(&self) -> &OutlierAnalyzer {
        &self.analyzer
    }

    /// Validates `lines` and draws a window from them.
    ///
    /// # Errors
    ///
    /// Propagates [`Sampler::sample`] errors.
    pub fn sample<S: AsRef<str>>(&self, lines: &[S]) -> Result<Window> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.sampler.sample(lines, &mut *rng)
    }

    /// # Errors
    ///
    /// Propagates [`OutlierAnalyzer::analyze`] errors.
    pub fn analyze(&self, values: &[f64]) -> Result<Analysis> {
        self.analyzer.analyze(values)
    }

    /// Runs sampler, analyzer and report builder over one ticker's lines.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage.
    pub fn process<S: AsRef<str>>(&self, ticker: &str, lines: &[S]) -> Result<PipelineOutput> {
        let window = self.sample(lines)?;
        let analysis = self.analyze(&window.prices)?;
        let rows = ReportBuilder::build(ticker, &window, &analysis)?;

        debug!(
            ticker,
            first_date = %window.timestamp(),
            mean = analysis.mean(),
            std_dev = analysis.std_dev(),
            outliers = rows.len(),
            "pipeline complete"
        );

        Ok(PipelineOutput {
            window,
            analysis,
            rows,
        })
    }
}

impl Default for OutlierService {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
