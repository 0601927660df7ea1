//! Error types.
//!
//! - `AppError`: what the binary reports (message + process exit code)
//! - `AnalyticsError`: typed failures raised by the pure analytics core
//!
//! Exit codes:
//! - `2` invalid input, configuration, or file I/O
//! - `3` analytics failure (e.g. a requested maturity is absent)
//! - `4` upstream data unavailable / network failure

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures raised while constructing or analysing domain values.
///
/// Construction-time variants (`NonMonotonicSeries`, `DuplicateEventId`, ...)
/// are raised eagerly so that the alignment and classification code never has
/// to re-check its inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A requested maturity is not present in the curve snapshot.
    #[error("Maturity {maturity}y is not present in the curve snapshot")]
    MissingMaturity { maturity: f64 },

    /// Two curve points share the same maturity.
    #[error("Duplicate maturity {maturity}y in curve snapshot")]
    DuplicateMaturity { maturity: f64 },

    /// Maturity must be finite and strictly positive.
    #[error("Invalid maturity {maturity} (must be finite and > 0)")]
    InvalidMaturity { maturity: f64 },

    /// A value that must be finite was NaN or infinite.
    #[error("Non-finite {what}")]
    NonFiniteValue { what: String },

    /// Observation dates must be strictly increasing.
    #[error("Observation dates not strictly increasing: {current} follows {previous}")]
    NonMonotonicSeries {
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Event identifiers must be unique within an event set.
    #[error("Duplicate event_id '{event_id}'")]
    DuplicateEventId { event_id: String },

    /// The reaction scale must be finite and non-zero.
    #[error("Invalid reaction scale {scale} (must be finite and non-zero)")]
    InvalidScale { scale: f64 },

    /// A day offset (lookback or comparison distance) is negative or too large.
    #[error("Invalid day offset {days} (must be between 0 and {max})")]
    InvalidDayOffset { days: i64, max: i64 },

    /// A retrieval collaborator returned no usable observations.
    #[error("No data returned for series {series_id}")]
    UpstreamDataUnavailable { series_id: String },
}

impl AnalyticsError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalyticsError::MissingMaturity { .. } => 3,
            AnalyticsError::UpstreamDataUnavailable { .. } => 4,
            AnalyticsError::DuplicateMaturity { .. }
            | AnalyticsError::InvalidMaturity { .. }
            | AnalyticsError::NonFiniteValue { .. }
            | AnalyticsError::NonMonotonicSeries { .. }
            | AnalyticsError::DuplicateEventId { .. }
            | AnalyticsError::InvalidScale { .. }
            | AnalyticsError::InvalidDayOffset { .. } => 2,
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
