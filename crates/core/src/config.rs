use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::analyzer::DEFAULT_THRESHOLD_SIGMAS;
use crate::sampler::DEFAULT_WINDOW_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding one sub-directory of price files per exchange.
    pub root_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub window_size: usize,
    pub threshold_sigmas: f64,
    /// Seed for the window sampler. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl AnalysisConfig {
    /// Checks that the analysis parameters describe a usable pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if `window_size` is zero or `threshold_sigmas` is not
    /// a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            bail!("analysis.window_size must be at least 1");
        }
        if !self.threshold_sigmas.is_finite() || self.threshold_sigmas <= 0.0 {
            bail!(
                "analysis.threshold_sigmas must be a positive number, got {}",
                self.threshold_sigmas
            );
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold_sigmas: DEFAULT_THRESHOLD_SIGMAS,
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            data: DataConfig {
                root_dir: PathBuf::from("./stock_price_data_files"),
            },
            analysis: AnalysisConfig::default(),
        }
    }
}
