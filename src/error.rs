//! Error types for the kwh-profile library.

use crate::core::Channel;
use thiserror::Error;

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Errors that can occur while profiling a building record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid input or parameter value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parallel sequences of a record disagree in length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The requested channel is not present in the record.
    #[error("channel {0} is not present in the record")]
    MissingChannel(Channel),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// The computation is undefined for the given data (zero range, all samples excluded).
    #[error("degenerate computation: {0}")]
    DegenerateComputation(String),

    /// A region or site could not be resolved.
    #[error("lookup failure: {0}")]
    LookupFailure(String),

    /// Configuration could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Dataset could not be decoded.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(String),
}

impl ProfileError {
    /// Whether this error belongs to the malformed-input class.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ProfileError::EmptyData
                | ProfileError::InsufficientData { .. }
                | ProfileError::InvalidInput(_)
                | ProfileError::DimensionMismatch { .. }
                | ProfileError::MissingChannel(_)
                | ProfileError::TimestampError(_)
        )
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        ProfileError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::DataFormat(err.to_string())
    }
}

impl From<toml::de::Error> for ProfileError {
    fn from(err: toml::de::Error) -> Self {
        ProfileError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ProfileError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ProfileError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(err.to_string(), "insufficient data: need at least 2, got 1");

        let err = ProfileError::InvalidInput("period length must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid input: period length must be positive"
        );

        let err = ProfileError::DimensionMismatch {
            expected: 48,
            got: 47,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 48, got 47");

        let err = ProfileError::MissingChannel(Channel::Temperature);
        assert_eq!(
            err.to_string(),
            "channel temps is not present in the record"
        );
    }

    #[test]
    fn invalid_input_class_excludes_degenerate_and_lookup() {
        assert!(ProfileError::EmptyData.is_invalid_input());
        assert!(ProfileError::MissingChannel(Channel::Usage).is_invalid_input());
        assert!(ProfileError::DimensionMismatch {
            expected: 1,
            got: 2
        }
        .is_invalid_input());
        assert!(!ProfileError::DegenerateComputation("zero range".to_string()).is_invalid_input());
        assert!(!ProfileError::LookupFailure("XX".to_string()).is_invalid_input());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: ProfileError = io.into();
        assert!(matches!(err, ProfileError::Io(msg) if msg.contains("missing.json")));
    }
}
