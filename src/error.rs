//! Core error types
//!
//! Defines every precondition violation the segmentation and retrieval
//! engine can surface. None of these are retried; callers decide whether
//! to log and abort.

use thiserror::Error;

/// Errors that can occur in the segmentation and retrieval core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdaError {
    /// Gap analysis needs at least two samples
    #[error("Insufficient data: gap analysis needs at least 2 samples, got {0}")]
    InsufficientData(usize),

    /// Gap threshold multiplier is negative or not a finite number
    #[error("Invalid gap threshold: sigma must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    /// A chunk has no derivable sampling rate
    #[error("Degenerate chunk starting at {start}: {reason}")]
    DegenerateChunk { start: i64, reason: String },

    /// A pattern component contains more than one wildcard
    #[error("Invalid pattern component {component:?}: at most one '*' is allowed")]
    InvalidPattern { component: String },

    /// Pattern or tag length does not match the index arity
    #[error("Arity mismatch: expected {expected} components, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A tag was inserted twice into the same index
    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),

    /// Bounds requested on an empty sample sequence
    #[error("Cannot compute bounds of an empty sequence")]
    EmptySequence,

    /// Bounds requested on an empty collection of runs
    #[error("Cannot compute bounds of an empty collection")]
    EmptyCollection,

    /// Bounds with start after end
    #[error("Invalid time bounds: start {start} is after end {end}")]
    InvalidBounds { start: i64, end: i64 },

    /// External chunk analysis failed
    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type alias for core operations
pub type EdaResult<T> = Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdaError::InsufficientData(1);
        assert_eq!(
            err.to_string(),
            "Insufficient data: gap analysis needs at least 2 samples, got 1"
        );

        let err = EdaError::ArityMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Arity mismatch: expected 3 components, got 2");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let err = EdaError::InvalidPattern {
            component: "*a*".to_string(),
        };
        assert!(err.to_string().contains("\"*a*\""));
    }
}
