//! Structured report types and file writing for umibin outputs.
//!
//! This module provides:
//! - [`Metric`] trait for serializable report row types
//! - [`binning`] - the per-bin statistics row and bin-map row
//! - [`writer`] - space-delimited report file output

pub mod binning;
pub mod writer;

use serde::Serialize;

/// Number of decimal places used for float columns.
pub const FLOAT_PRECISION: usize = 6;

/// Formats a float value with the standard precision for report columns.
///
/// # Example
/// ```
/// use umibin_lib::metrics::format_float;
/// assert_eq!(format_float(0.9), "0.900000");
/// assert_eq!(format_float(15.0), "15.000000");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:.FLOAT_PRECISION$}")
}

/// A report row type that can be serialized to a delimited file.
pub trait Metric: Serialize + Clone {
    /// Human-readable name for this row type.
    ///
    /// Used in error messages when writing report files.
    fn metric_name() -> &'static str;
}

// Re-export commonly used types
pub use binning::{BinAssignment, UmiBinningStats};
pub use writer::{write_bin_map, write_metrics};
