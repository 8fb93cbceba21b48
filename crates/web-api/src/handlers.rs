use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use price_outlier_core::OutlierService;
use price_outlier_data::PriceFileStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared state behind every handler.
pub struct AppState {
    pub service: OutlierService,
    pub store: PriceFileStore,
}

impl AppState {
    #[must_use]
    pub fn new(service: OutlierService, store: PriceFileStore) -> Self {
        Self { service, store }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataPointsResponse {
    pub stock_prices: Vec<f64>,
    /// Date of the first price, `dd-mm-yyyy`.
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OutliersResponse {
    pub outliers: Vec<usize>,
    pub mean: String,
    pub std_dev: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Samples a window of prices from a file under the data root.
///
/// The file is read on the blocking pool.
///
/// # Errors
/// Returns `404` if the file does not exist, `400` if the path is unsafe or
/// the file is malformed or too short.
pub async fn get_data_points(
    State(state): State<Arc<AppState>>,
    Path(input_file): Path<String>,
) -> Result<Json<DataPointsResponse>, ApiError> {
    let store = state.store.clone();
    let relative = input_file.trim_start_matches('/').to_string();
    let lines = tokio::task::spawn_blocking(move || store.read_lines(&relative)).await??;
    let window = state.service.sample(&lines)?;

    Ok(Json(DataPointsResponse {
        timestamp: window.timestamp(),
        stock_prices: window.prices,
    }))
}

/// Classifies a comma-separated list of values.
///
/// # Errors
/// Returns `400` if any value is not a finite float.
pub async fn get_outliers(
    State(state): State<Arc<AppState>>,
    Path(values): Path<String>,
) -> Result<Json<OutliersResponse>, ApiError> {
    let values = parse_values(&values)?;
    let analysis = state.service.analyze(&values)?;

    Ok(Json(OutliersResponse {
        mean: format!("{:.2}", analysis.mean()),
        std_dev: format!("{:.2}", analysis.std_dev()),
        outliers: analysis.outliers,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn parse_values(raw: &str) -> Result<Vec<f64>, ApiError> {
    raw.split(',')
        .map(|v| match v.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ApiError::InvalidValues),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_floats() {
        assert_eq!(parse_values("1,2.5, -3").unwrap(), vec![1.0, 2.5, -3.0]);
    }

    #[test]
    fn rejects_garbage_and_non_finite_values() {
        for raw in ["1,abc", "1,,2", "", "1,NaN", "inf"] {
            assert!(
                matches!(parse_values(raw), Err(ApiError::InvalidValues)),
                "{raw}"
            );
        }
    }
}
