//! Progress tracking utilities
//!
//! This module provides a progress tracker for logging record counts at regular
//! intervals while streaming a SAM file. The binning core is single-threaded,
//! so the tracker keeps its count in a [`Cell`] rather than an atomic.

use log::info;
use std::cell::Cell;

/// Progress tracker for logging progress at regular intervals.
///
/// Maintains an internal count and logs progress messages when the count crosses
/// interval boundaries.
///
/// # Example
/// ```
/// use umibin_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Read UMI1 records").with_interval(100);
///
/// // Add items and log at interval boundaries
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // Logs at 100, 200
/// }
/// tracker.log_final(); // Logs "Read UMI1 records 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed.
    count: Cell<u64>,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and a default interval of 1,000,000
    /// (SAM inputs commonly run to tens of millions of records).
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: Cell::new(0) }
    }

    /// Set the logging interval.
    ///
    /// Progress will be logged each time the count crosses a multiple of this interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Add to the count and log if an interval boundary was crossed.
    ///
    /// Returns `true` if the final count is exactly a multiple of the interval;
    /// [`log_final`](Self::log_final) uses this to decide whether a closing
    /// message is still needed.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        let prev = self.count.get();
        let new_count = prev + additional;
        self.count.set(new_count);

        if additional == 0 {
            return new_count > 0 && new_count % self.interval == 0;
        }

        // Log once per interval boundary crossed
        let prev_intervals = prev / self.interval;
        let new_intervals = new_count / self.interval;
        for i in (prev_intervals + 1)..=new_intervals {
            info!("{} {}", self.message, i * self.interval);
        }

        new_count % self.interval == 0
    }

    /// Log final progress.
    ///
    /// If the current count is not exactly on an interval boundary, logs a final
    /// message with "(complete)". If it is, the last `log_if_needed` call already
    /// logged it and no additional message is emitted.
    pub fn log_final(&self) {
        if !self.log_if_needed(0) {
            let count = self.count.get();
            if count > 0 {
                info!("{} {} (complete)", self.message, count);
            }
        }
    }

    /// Get the current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.get()
    }
}
