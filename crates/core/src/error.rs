//! Error types for the outlier pipeline.
//!
//! Every variant is a local validation failure. Nothing here is retried:
//! callers classify the error and decide how to present it.

use thiserror::Error;

/// Errors produced while sampling, analyzing or reporting a price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlierError {
    /// A record could not be parsed; the whole batch is rejected.
    #[error("format error: {0}")]
    Format(String),

    /// Fewer valid records than the window requires.
    #[error("insufficient data: need at least {required} stock prices, found {available}")]
    InsufficientData {
        /// Window length the sampler was asked for.
        required: usize,
        /// Valid, non-blank records actually present.
        available: usize,
    },

    /// The analyzer was given no values, so the mean is undefined.
    #[error("cannot analyze an empty sequence of values")]
    EmptyInput,

    /// Percent deviation requested against a zero standard deviation.
    #[error("standard deviation is zero, percent deviation is undefined")]
    DivisionGuard,

    /// Offsetting the first window date left the supported calendar range.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

impl OutlierError {
    /// Creates a format error from any displayable description.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Returns true for errors caused by the caller's input rather than
    /// by an internal guard.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::InsufficientData { .. } | Self::EmptyInput
        )
    }
}

pub type Result<T> = std::result::Result<T, OutlierError>;
