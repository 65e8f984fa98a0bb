//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters
//! and file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`] to provide
//! rich contextual information when validation fails.

use crate::errors::{Result, UmibinError};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "UMI1 SAM")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use umibin_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/umi1_map.sam", "UMI1 SAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(UmibinError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist
///
/// # Arguments
/// * `files` - Slice of (path, description) tuples
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate that a fraction lies in the half-open interval `(min, max]`
///
/// Used for the read-orientation fraction, which must be strictly positive
/// and cannot exceed one half (a "minority" strand cannot hold more than
/// half the reads).
///
/// # Errors
/// Returns an error if the value is outside `(min, max]`
///
/// # Example
/// ```
/// use umibin_lib::validation::validate_fraction;
///
/// validate_fraction(0.3, 0.0, 0.5, "ro-frac").unwrap();
/// assert!(validate_fraction(0.0, 0.0, 0.5, "ro-frac").is_err());
/// assert!(validate_fraction(0.6, 0.0, 0.5, "ro-frac").is_err());
/// ```
pub fn validate_fraction(value: f64, min: f64, max: f64, name: &str) -> Result<()> {
    if value <= min || value > max {
        return Err(UmibinError::InvalidFraction {
            parameter: name.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate that a value is positive (> 0)
///
/// # Arguments
/// * `value` - Value to validate
/// * `name` - Name of the parameter for error messages
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use umibin_lib::validation::validate_positive;
///
/// validate_positive(10_000_u64, "max-bin-size").unwrap();
///
/// let result = validate_positive(0_u64, "max-bin-size");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(UmibinError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}
