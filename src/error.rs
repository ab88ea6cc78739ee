//! Error types for the tsanalyzer library.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur during analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// Input shape or parameter constraint violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Result requested before a successful compute().
    #[error("result not yet computed: call compute() first")]
    NotComputed,

    /// Figure rendering failed in the plotting backend.
    #[error("plot error: {0}")]
    Plot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_constraint() {
        let err = AnalyzerError::InvalidInput("sampling rate must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid input: sampling rate must be positive, got 0"
        );

        let err = AnalyzerError::NotComputed;
        assert_eq!(
            err.to_string(),
            "result not yet computed: call compute() first"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = AnalyzerError::NotComputed;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, AnalyzerError::InvalidInput("x".to_string()));
    }
}
