//! Error types for the pong Q-learning crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("{name} must have at least one division")]
    ZeroDivisions { name: &'static str },

    #[error("court bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("{parameter} = {value} is outside the range {range}")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("invalid difficulty '{input}'. Expected one of: {expected}")]
    ParseDifficulty { input: String, expected: String },

    #[error("invalid controller '{input}'. Expected one of: {expected}")]
    ParseController { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_operation() {
        let err = Error::Io {
            operation: "open file \"missing.dat\"".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to open file \"missing.dat\": not found");
    }

    #[test]
    fn test_parameter_out_of_range_display() {
        let err = Error::ParameterOutOfRange {
            parameter: "alpha",
            value: 1.5,
            range: "(0, 1]",
        };
        assert_eq!(err.to_string(), "alpha = 1.5 is outside the range (0, 1]");
    }
}
