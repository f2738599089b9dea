//! Error types for sampled properties

use serde::{Deserialize, Serialize};

/// Failures surfaced by sampled property operations.
///
/// Every variant describes invalid input or invalid configuration. Running out of
/// samples for an interpolation is not an error; queries report it as `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SampledError {
    /// Parallel time/value sequences differ in length
    #[error("Length mismatch: {times} times but {values} values")]
    LengthMismatch { times: usize, values: usize },

    /// Flat value buffer does not hold one block per time
    #[error("Expected {expected} values ({times} blocks), got {actual}")]
    ValueBufferLength {
        times: usize,
        expected: usize,
        actual: usize,
    },

    /// Derivative sequences do not match the configured derivative order
    #[error("Expected {expected} derivatives per sample, got {actual}")]
    DerivativeCount { expected: usize, actual: usize },

    /// Packed array is not a whole number of (time, block) tuples
    #[error("Packed array of length {len} is not a multiple of the tuple stride {stride}")]
    MalformedPackedArray { len: usize, stride: usize },

    /// A value slot of a packed array holds a time instead of a number
    #[error("Packed index {index} must be numeric")]
    NonNumericValue { index: usize },

    /// A numeric time offset was supplied without an epoch
    #[error("Time offset at packed index {index} requires an epoch")]
    MissingEpoch { index: usize },

    /// Time text could not be parsed
    #[error("Invalid time '{text}': {reason}")]
    InvalidTime { text: String, reason: String },

    /// Offset arithmetic left the representable time range
    #[error("Adding {seconds} seconds overflows the time range")]
    TimeOverflow { seconds: f64 },

    /// Value codec or property configuration cannot be used
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Interpolation algorithm name is not registered
    #[error("Interpolation algorithm not found: {name}")]
    AlgorithmNotFound { name: String },
}

impl SampledError {
    /// Build a configuration error from a reason string
    #[inline]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. }
            | Self::ValueBufferLength { .. }
            | Self::DerivativeCount { .. }
            | Self::MalformedPackedArray { .. }
            | Self::NonNumericValue { .. } => "input",
            Self::MissingEpoch { .. } | Self::InvalidTime { .. } | Self::TimeOverflow { .. } => {
                "time"
            }
            Self::InvalidConfiguration { .. } | Self::AlgorithmNotFound { .. } => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let input = SampledError::LengthMismatch {
            times: 2,
            values: 3,
        };
        assert_eq!(input.category(), "input");

        let time = SampledError::MissingEpoch { index: 0 };
        assert_eq!(time.category(), "time");

        let config = SampledError::configuration("packed length must be non-zero");
        assert_eq!(config.category(), "configuration");
    }

    #[test]
    fn test_error_display() {
        let err = SampledError::MalformedPackedArray { len: 5, stride: 2 };
        assert_eq!(
            err.to_string(),
            "Packed array of length 5 is not a multiple of the tuple stride 2"
        );
    }
}
