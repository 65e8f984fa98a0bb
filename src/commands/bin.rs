//! Read binning by dual UMIs.
//!
//! This command consumes the two per-end SAM files a prior pipeline stage
//! produced by aligning the canonical UMI reference catalog against the UMI
//! regions of every read, and emits the final read-to-bin map together with a
//! per-bin statistics table.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use log::info;

use umibin_lib::binning::{bin_reads, BinningConfig};
use umibin_lib::candidates::CandidateIndex;
use umibin_lib::logging::{format_count, log_binning_summary, OperationTimer};
use umibin_lib::metrics::writer::{write_bin_map, write_binning_stats};
use umibin_lib::progress::ProgressTracker;
use umibin_lib::sam::SamHitReader;
use umibin_lib::symbols::SymbolTable;
use umibin_lib::validation::{validate_files_exist, validate_fraction, validate_positive};

use crate::commands::command::Command;

/// Subdirectory of the output dir holding the SAM inputs and the reports.
const BINNING_SUBDIR: &str = "read_binning";
/// UMI1-end alignment input.
const UMI1_SAM: &str = "umi1_map.sam";
/// UMI2-end alignment input.
const UMI2_SAM: &str = "umi2_map.sam";
/// Per-bin statistics output.
const STATS_FILE: &str = "umi_binning_stats.txt";
/// Read-to-bin map output.
const BIN_MAP_FILE: &str = "umi_bin_map.txt";

/// Bins reads by the UMI pair on their ends.
///
/// Reads two SAM files (`read_binning/umi1_map.sam` and
/// `read_binning/umi2_map.sam` under the output directory), intersects the
/// candidate hits so only reads matching the same UMI reference on both ends
/// remain, and resolves conflicts by minimum combined edit distance. Bins are
/// then classified by read-orientation balance, match-error statistics and
/// the bin-size/cluster-size ratio; only bins passing all three filters
/// contribute reads to the bin map.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bin",
    author,
    version,
    about = "Assign reads to UMI bins from the per-end UMI alignments",
    long_about = r#"
Assigns each read to at most one UMI bin using the per-end UMI alignments.

A prior stage aligned the canonical UMI references against the UMI regions of
every read, once per read end, producing `read_binning/umi1_map.sam` and
`read_binning/umi2_map.sam` under the output directory. This command:

1. Streams both SAM files, expanding each record into its primary hit and any
   forward-strand secondary hits from the `XA` tag
2. Keeps reads that match the same UMI reference on both ends within the
   per-end and combined edit-distance thresholds, resolving multi-UMI
   conflicts by minimum combined distance
3. Classifies every bin by read-orientation balance (subsampling imbalanced
   bins), by the mean/SD of the combined match error, and by the ratio of bin
   size to the UMI's upstream cluster size
4. Writes `umi_binning_stats.txt` (one row per bin) and `umi_bin_map.txt`
   (one row per retained read) next to the inputs

Bins only reach the bin map when all three filters pass; every bin with at
least one assigned read gets a statistics row either way.
"#
)]
pub struct BinReads {
    /// Directory containing read_binning/ with the two UMI SAM files.
    #[arg(short = 'd', long = "output-dir")]
    pub output_dir: PathBuf,

    /// Maximum edit distance allowed on either UMI end.
    #[arg(short = 'u', long = "per-umi-max")]
    pub per_umi_max: u32,

    /// Maximum summed edit distance across both UMI ends.
    #[arg(short = 'c', long = "combined-max")]
    pub combined_max: u32,

    /// Maximum per-bin mean combined match error.
    #[arg(short = 'U', long = "ume-mean-max")]
    pub ume_mean_max: f64,

    /// Maximum per-bin combined match error standard deviation.
    #[arg(long = "ume-sd-max")]
    pub ume_sd_max: f64,

    /// Minimum fraction of bin reads on the minority strand (0 < f <= 0.5).
    #[arg(short = 'O', long = "ro-frac")]
    pub ro_frac: f64,

    /// Per-strand read cap for orientation-balanced bins.
    #[arg(short = 'N', long = "max-bin-size", default_value = "10000")]
    pub max_bin_size: u64,

    /// Maximum ratio of bin size to upstream cluster size.
    #[arg(short = 'S', long = "bin-cluster-ratio", default_value = "10")]
    pub bin_cluster_ratio: f64,
}

impl Command for BinReads {
    /// Executes the binning pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, an input SAM file cannot be
    /// opened, or a report file cannot be written.
    fn execute(&self) -> Result<()> {
        self.validate()?;

        let timer = OperationTimer::new("Binning reads by UMI");
        let mut symbols = SymbolTable::new();

        let umi1_path = self.input_path(UMI1_SAM);
        info!("Loading UMI1 alignments from {}", umi1_path.display());
        let index1 = Self::load_index(&umi1_path, "UMI1", &mut symbols)?;

        let umi2_path = self.input_path(UMI2_SAM);
        info!("Loading UMI2 alignments from {}", umi2_path.display());
        let index2 = Self::load_index(&umi2_path, "UMI2", &mut symbols)?;

        let output = bin_reads(&index1, &index2, &symbols, &self.config());

        info!("Writing reports");
        let stats_path = self.input_path(STATS_FILE);
        write_binning_stats(&stats_path, &output.stats)?;
        info!("Wrote {} bin rows to {}", format_count(output.stats.len() as u64), stats_path.display());

        let map_path = self.input_path(BIN_MAP_FILE);
        write_bin_map(&map_path, &output.bin_map)?;
        info!(
            "Wrote {} read rows to {}",
            format_count(output.bin_map.len() as u64),
            map_path.display()
        );

        log_binning_summary(&output.summary);
        timer.log_completion(index1.record_count() + index2.record_count());
        Ok(())
    }
}

impl BinReads {
    /// Validates parameters and input files before any output is touched.
    fn validate(&self) -> Result<()> {
        validate_fraction(self.ro_frac, 0.0, 0.5, "ro-frac")?;
        validate_positive(self.max_bin_size, "max-bin-size")?;
        validate_files_exist(&[
            (self.input_path(UMI1_SAM), "UMI1 SAM"),
            (self.input_path(UMI2_SAM), "UMI2 SAM"),
        ])?;
        Ok(())
    }

    /// Path of a file inside the binning subdirectory.
    fn input_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(BINNING_SUBDIR).join(name)
    }

    /// The engine configuration bundle.
    fn config(&self) -> BinningConfig {
        BinningConfig {
            per_umi_max: self.per_umi_max,
            combined_max: self.combined_max,
            ume_mean_max: self.ume_mean_max,
            ume_sd_max: self.ume_sd_max,
            ro_frac: self.ro_frac,
            max_bin_size: self.max_bin_size,
            bin_cluster_ratio: self.bin_cluster_ratio,
        }
    }

    /// Streams one SAM file into a candidate index, logging progress.
    fn load_index(path: &Path, label: &str, symbols: &mut SymbolTable) -> Result<CandidateIndex> {
        let mut reader = SamHitReader::from_path(path)?;
        let progress = ProgressTracker::new(format!("Read {label} records"));
        let index = CandidateIndex::from_reader_with_progress(&mut reader, symbols, Some(&progress))?;
        info!(
            "{label}: {} records, {} hits, {} UMI references, {} malformed lines skipped",
            format_count(index.record_count()),
            format_count(index.hit_count()),
            format_count(index.umi_count() as u64),
            format_count(index.skipped_count())
        );
        Ok(index)
    }
}
