//! Utilities for writing report files.
//!
//! Both outputs are single-space-delimited text, one record per line, final
//! line terminated with `\n`. The stats table carries a header row (written
//! even when there are no rows); the bin map is headerless.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::path::Path;

use super::binning::{BinAssignment, UmiBinningStats};
use super::Metric;

/// Output field delimiter.
const DELIMITER: u8 = b' ';

/// Write metric rows to a space-delimited file with a header row.
///
/// The header is written explicitly so that an empty run still produces a
/// well-formed file.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
///
/// # Example
/// ```no_run
/// use umibin_lib::metrics::writer::write_metrics;
/// use umibin_lib::metrics::UmiBinningStats;
/// use std::path::Path;
///
/// let rows: Vec<UmiBinningStats> = vec![];
/// write_metrics(Path::new("umi_binning_stats.txt"), &rows, &UmiBinningStats::HEADER).unwrap();
/// ```
pub fn write_metrics<P: AsRef<Path>, T: Metric>(
    path: P,
    metrics: &[T],
    header: &[&str],
) -> Result<()> {
    let path_ref = path.as_ref();
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_path(path_ref)
        .with_context(|| {
            format!("Failed to create {} file: {}", T::metric_name(), path_ref.display())
        })?;

    writer.write_record(header)?;
    for metric in metrics {
        writer.serialize(metric)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {} file: {}", T::metric_name(), path_ref.display()))
}

/// Write the headerless bin map.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_bin_map<P: AsRef<Path>>(path: P, assignments: &[BinAssignment]) -> Result<()> {
    let path_ref = path.as_ref();
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_path(path_ref)
        .with_context(|| {
            format!(
                "Failed to create {} file: {}",
                BinAssignment::metric_name(),
                path_ref.display()
            )
        })?;

    for assignment in assignments {
        writer.serialize(assignment)?;
    }
    writer.flush().with_context(|| {
        format!("Failed to write {} file: {}", BinAssignment::metric_name(), path_ref.display())
    })
}

/// Write the stats table with its standard header.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_binning_stats<P: AsRef<Path>>(path: P, rows: &[UmiBinningStats]) -> Result<()> {
    write_metrics(path, rows, &UmiBinningStats::HEADER)
}
