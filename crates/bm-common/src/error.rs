use thiserror::Error;

use crate::matching::weights::Dimension;

/// Input-validation failures. The engine performs no I/O, so nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("weight sum must be positive, got {sum}")]
    NonPositiveWeightSum { sum: f64 },
    #[error("weight for {dimension} must be a finite non-negative number, got {value}")]
    InvalidWeight { dimension: Dimension, value: f64 },
    #[error("unknown weight preset: {0}")]
    UnknownPreset(String),
    #[error("unknown scoring dimension: {0}")]
    UnknownDimension(String),
    #[error("result limit must be between 1 and {max}, got {k}")]
    InvalidLimit { k: usize, max: usize },
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("threshold {0} only applies to near matches; use min_score for strict rankings")]
    ThresholdWithoutNearMatches(f64),
    #[error("invalid assignment {field}: {reason}")]
    InvalidRequirement { field: String, reason: String },
    #[error("invalid profile {field}: {reason}")]
    InvalidProfile { field: String, reason: String },
}
