//! Report rows for the binning outputs.
//!
//! Two files are produced per run: `umi_binning_stats.txt` (one
//! [`UmiBinningStats`] row per canonical bin, with a header) and
//! `umi_bin_map.txt` (one headerless [`BinAssignment`] row per retained read).

use serde::{Deserialize, Serialize, Serializer};

use super::{format_float, Metric};
use crate::cluster_ratio::BcrState;
use crate::error_stats::UmeState;
use crate::orientation::RorState;

fn serialize_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_float(*value))
}

fn serialize_opt_float<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&format_float(*v)),
        None => serializer.serialize_str(""),
    }
}

/// One bin's row in `umi_binning_stats.txt`.
///
/// Statistics belonging to a stage the bin never reached (the match-error and
/// cluster-ratio fields of a bin with no surviving reads) are `None` and
/// render as empty fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UmiBinningStats {
    /// Canonical UMI name (no `_rc` suffix).
    pub umi_name: String,

    /// Reads assigned to the bin before orientation subsampling.
    pub read_n_raw: u64,

    /// Reads surviving orientation subsampling.
    pub read_n_filt: u64,

    /// Assigned reads on the plus strand.
    pub read_n_plus: u64,

    /// Assigned reads on the minus strand.
    pub read_n_neg: u64,

    /// Plus-strand cap plus the plus-strand count, as reported by the source
    /// pipeline.
    pub read_max_plus: u64,

    /// Minus-strand cap plus the minus-strand count.
    pub read_max_neg: u64,

    /// Fraction of assigned reads on the minority strand.
    #[serde(serialize_with = "serialize_float")]
    pub read_orientation_ratio: f64,

    /// Read-orientation filter state.
    pub ror_filter: RorState,

    /// Mean combined match error of surviving reads.
    #[serde(serialize_with = "serialize_opt_float")]
    pub umi_match_error_mean: Option<f64>,

    /// Population SD of the combined match error of surviving reads.
    #[serde(serialize_with = "serialize_opt_float")]
    pub umi_match_error_sd: Option<f64>,

    /// Match-error filter state.
    pub ume_filter: Option<UmeState>,

    /// Raw bin size divided by the UMI's upstream cluster size.
    #[serde(serialize_with = "serialize_opt_float")]
    pub bin_cluster_ratio: Option<f64>,

    /// Bin/cluster-ratio filter state.
    pub bcr_filter: Option<BcrState>,
}

impl UmiBinningStats {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 14] = [
        "umi_name",
        "read_n_raw",
        "read_n_filt",
        "read_n_plus",
        "read_n_neg",
        "read_max_plus",
        "read_max_neg",
        "read_orientation_ratio",
        "ror_filter",
        "umi_match_error_mean",
        "umi_match_error_sd",
        "ume_filter",
        "bin_cluster_ratio",
        "bcr_filter",
    ];
}

impl Metric for UmiBinningStats {
    fn metric_name() -> &'static str {
        "UMI binning stats"
    }
}

/// One retained read's row in `umi_bin_map.txt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinAssignment {
    /// Canonical UMI name of the bin.
    pub umi_name: String,

    /// Read name.
    pub read_name: String,

    /// Summed edit distance over both read ends.
    pub combined_err: u32,
}

impl Metric for BinAssignment {
    fn metric_name() -> &'static str {
        "UMI bin map"
    }
}
