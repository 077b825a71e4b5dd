use thiserror::Error;

/// Errors raised by configuration and loading. Empty selections are never errors.
#[derive(Debug, Error)]
pub enum FaixaError {
    #[error("tier count must be between {min} and {max}, got {count}", min = crate::analysis::tiers::MIN_TIERS, max = crate::analysis::tiers::MAX_TIERS)]
    TierCount { count: usize },

    #[error("expected {expected} thresholds, got {actual}")]
    ThresholdCount { expected: usize, actual: usize },

    #[error("threshold #{index} ({value}) must be greater than the previous one ({previous})")]
    NonMonotonicThresholds {
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("threshold #{index} ({value}) must be a positive finite number")]
    InvalidThreshold { index: usize, value: f64 },

    #[error("bucket thresholds must be a non-empty increasing list")]
    EmptyBoundaries,

    #[error("unknown tier: {label}")]
    UnknownTier { label: String },

    #[error("invalid period: {input} (expected YYYY-MM or YYYY-M<m>)")]
    InvalidPeriod { input: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FaixaError>;
