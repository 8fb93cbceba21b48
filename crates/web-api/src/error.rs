//! Mapping of pipeline and storage failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use price_outlier_core::OutlierError;
use price_outlier_data::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] OutlierError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Values must be a list of floats separated by commas")]
    InvalidValues,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Pipeline(err) if err.is_input_error() => StatusCode::BAD_REQUEST,
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::InvalidPath(_)) | Self::InvalidValues => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(StoreError::Io { .. }) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Pipeline(OutlierError::Format(reason)) => format!(
                "File must have the format: Stock-ID (Ticker), Timestamp (dd-mm-yyyy), stock price value ({reason})"
            ),
            Self::Pipeline(OutlierError::InsufficientData { required, .. }) => {
                format!("File must have at least {required} stock prices")
            }
            Self::Store(StoreError::Io { .. }) | Self::Task(_) => {
                "Failed to read stock price file".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_blocking_read_is_500() {
        let join_err = tokio::task::spawn_blocking(|| panic!("reader crashed"))
            .await
            .unwrap_err();
        let err = ApiError::from(join_err);

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to read stock price file");
    }

    #[test]
    fn not_found_is_404() {
        let err = ApiError::from(StoreError::NotFound("LSE/NOPE.csv".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
