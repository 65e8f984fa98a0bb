//! Enhanced logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly logging utilities for run
//! summaries and operation timing.

use std::time::{Duration, Instant};

use crate::binning::BinningSummary;

/// Formats a count with thousands separators.
///
/// # Example
///
/// ```
/// use umibin_lib::logging::format_count;
///
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// assert_eq!(format_count(42), "42");
/// ```
#[must_use]
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage with specified decimal places.
///
/// # Arguments
///
/// * `value` - The fraction (0.0-1.0) to format as percentage
/// * `decimals` - Number of decimal places to include
///
/// # Examples
///
/// ```
/// use umibin_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use umibin_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (items per second) with appropriate units.
///
/// # Examples
///
/// ```
/// use umibin_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a formatted summary of a binning run.
///
/// Outputs per-stage counts: hits loaded, reads assigned, bin state breakdown,
/// and the number of reads that reached the bin map.
///
/// # Examples
///
/// ```no_run
/// use umibin_lib::binning::BinningSummary;
/// use umibin_lib::logging::log_binning_summary;
///
/// let mut summary = BinningSummary::default();
/// summary.reads_assigned = 10_000;
/// summary.reads_emitted = 8_000;
///
/// log_binning_summary(&summary);
/// ```
pub fn log_binning_summary(summary: &BinningSummary) {
    log::info!("UMI Binning Summary:");
    log::info!("  Candidate reads (both ends): {}", format_count(summary.reads_with_both_ends));
    log::info!("  Assigned reads: {}", format_count(summary.reads_assigned));
    log::info!("  Bins with assigned reads: {}", format_count(summary.bins_total));
    log::info!("  Bins failing orientation: {}", format_count(summary.bins_rof_fail));
    log::info!("  Bins subsampled for orientation: {}", format_count(summary.bins_rof_subset));
    log::info!("  Bins failing match-error stats: {}", format_count(summary.bins_ume_fail));
    log::info!("  Bins failing bin/cluster ratio: {}", format_count(summary.bins_bcr_fail));
    log::info!("  Bins emitted: {}", format_count(summary.bins_emitted));
    log::info!("  Reads emitted: {}", format_count(summary.reads_emitted));

    if summary.reads_assigned > 0 {
        let keep_rate = summary.reads_emitted as f64 / summary.reads_assigned as f64;
        log::info!("  Read keep rate: {}", format_percent(keep_rate, 2));
    }
}

/// Operation timing and summary helper.
///
/// Tracks operation timing and provides formatted summary output.
///
/// # Examples
///
/// ```no_run
/// use umibin_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Binning reads");
///
/// // ... do work ...
///
/// timer.log_completion(10_000); // Log with item count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
