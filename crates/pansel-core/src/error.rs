//! Unified error types for the pansel ecosystem
//!
//! This module provides a common error type [`PanselError`] that can represent
//! errors from any part of the system. Domain-specific error types can be
//! converted to `PanselError` for uniform error handling at API boundaries.
//!
//! Note that an infeasible sizing problem is *not* an error: it is a valid
//! outcome carried in the solution types, so that one panel's infeasibility
//! never aborts a batch.

use thiserror::Error;

/// Unified error type for all pansel operations.
#[derive(Error, Debug)]
pub enum PanselError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Catalog or demand data errors (unknown panel, malformed row,
    /// missing required column)
    #[error("Data error: {0}")]
    Data(String),

    /// Solver/formulation errors that are not a plain infeasibility
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using PanselError.
pub type PanselResult<T> = Result<T, PanselError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for PanselError {
    fn from(err: anyhow::Error) -> Self {
        PanselError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for PanselError {
    fn from(s: String) -> Self {
        PanselError::Other(s)
    }
}

impl From<&str> for PanselError {
    fn from(s: &str) -> Self {
        PanselError::Other(s.to_string())
    }
}

// JSON parsing errors
impl From<serde_json::Error> for PanselError {
    fn from(err: serde_json::Error) -> Self {
        PanselError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PanselError::Data("unknown panel 'AHU-7'".into());
        assert!(err.to_string().contains("Data error"));
        assert!(err.to_string().contains("AHU-7"));
    }

    #[test]
    fn test_solver_error_display() {
        let err = PanselError::Solver("backend crashed mid-solve".into());
        assert!(err.to_string().contains("Solver error"));
        assert!(err.to_string().contains("mid-solve"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PanselError = io_err.into();
        assert!(matches!(err, PanselError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> PanselResult<()> {
            Err(PanselError::Data("test".into()))
        }

        fn outer() -> PanselResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
