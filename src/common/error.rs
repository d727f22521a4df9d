//! Error types for rust_hector_matching

use thiserror::Error;

/// Main error type for grid maps and scan matching
#[derive(Debug, Error)]
pub enum SlamError {
    /// The map-to-world transform of a grid has no inverse
    #[error("Map to world transform is not invertible (resolution: {0})")]
    NonInvertibleTransform(f64),
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Numerical computation failed (linear solve, etc.)
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    VisualizationError(String),
}

/// Result type alias for grid and matching operations
pub type SlamResult<T> = Result<T, SlamError>;
