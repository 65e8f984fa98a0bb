//! Custom error types for umibin operations.

use thiserror::Error;

/// Result type alias for umibin operations
pub type Result<T> = std::result::Result<T, UmibinError>;

/// Error type for umibin operations
#[derive(Error, Debug)]
pub enum UmibinError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Invalid fraction threshold
    #[error("Invalid fraction '{parameter}': {value} (must be > {min} and <= {max})")]
    InvalidFraction {
        /// The parameter name
        parameter: String,
        /// The invalid fraction value
        value: f64,
        /// Exclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "SAM", "stats")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}
