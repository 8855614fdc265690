//! Shared error type across idmetrics crates.

use thiserror::Error;

use crate::family::MetricKind;

/// Stable error codes (used in logs and as the `reason` label of dropped updates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DuplicateMetric,
    InvalidMetricName,
    InvalidLabelName,
    InvalidBuckets,
    SchemaMismatch,
    UnknownMetric,
    InvalidDelta,
    WrongKind,
    Config,
}

impl ErrorCode {
    /// String representation used in logs and label values.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorCode::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::SchemaMismatch => "SCHEMA_MISMATCH",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::WrongKind => "WRONG_KIND",
            ErrorCode::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by the engine and the exporter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name: {0:?}")]
    InvalidLabelName(String),
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("label schema mismatch: expected {expected} values, got {got}")]
    SchemaMismatch { expected: usize, got: usize },
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("invalid counter delta: {0}")]
    InvalidDelta(f64),
    #[error("metric {name} is a {actual}, not a {expected}")]
    WrongKind {
        name: String,
        expected: MetricKind,
        actual: MetricKind,
    },
    #[error("config: {0}")]
    Config(String),
}

impl MetricsError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            MetricsError::InvalidMetricName(_) => ErrorCode::InvalidMetricName,
            MetricsError::InvalidLabelName(_) => ErrorCode::InvalidLabelName,
            MetricsError::InvalidBuckets(_) => ErrorCode::InvalidBuckets,
            MetricsError::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            MetricsError::UnknownMetric(_) => ErrorCode::UnknownMetric,
            MetricsError::InvalidDelta(_) => ErrorCode::InvalidDelta,
            MetricsError::WrongKind { .. } => ErrorCode::WrongKind,
            MetricsError::Config(_) => ErrorCode::Config,
        }
    }

    /// Registration and startup errors are wiring bugs and must halt the process.
    /// Everything else happens on the update path and is dropped by callers.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MetricsError::DuplicateMetric(_)
                | MetricsError::InvalidMetricName(_)
                | MetricsError::InvalidLabelName(_)
                | MetricsError::InvalidBuckets(_)
                | MetricsError::Config(_)
        )
    }
}
