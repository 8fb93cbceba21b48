pub mod analyzer;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod report;
pub mod sampler;
pub mod service;
pub mod types;

pub use analyzer::{mean, population_std_dev, OutlierAnalyzer};
pub use config::{AnalysisConfig, AppConfig, DataConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use error::OutlierError;
pub use report::{percent_deviation, ReportBuilder, REPORT_HEADER};
pub use sampler::{parse_records, Sampler};
pub use service::{OutlierService, PipelineOutput};
pub use types::{format_price, Analysis, RawRecord, ReportRow, Statistics, Window, DATE_FORMAT};
