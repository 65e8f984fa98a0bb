//! Bin-size / cluster-size ratio filtering.
//!
//! Every canonical UMI name carries the multiplicity of its reference in the
//! upstream clustering stage as a trailing `;size=S;` field. A bin that
//! collects far more reads than its clustering support predicts is a
//! chimera/artefact signature, so the ratio of raw bin size to cluster size is
//! capped.

use serde::{Deserialize, Serialize};

/// Bin/cluster-ratio filter state for one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BcrState {
    /// Ratio within the cutoff.
    #[serde(rename = "bcr_ok")]
    Ok,
    /// Ratio above the cutoff, or the cluster size was absent/zero.
    #[serde(rename = "bcr_fail")]
    Fail,
}

/// Extracts the cluster size from a canonical UMI name.
///
/// The name grammar is `umiN;size=S;`: the value is the digits of the last
/// `size=` field, up to the next `;` or the end of the name. Returns `None`
/// when the field is missing or does not parse as a positive integer.
///
/// # Example
///
/// ```
/// use umibin_lib::cluster_ratio::cluster_size;
///
/// assert_eq!(cluster_size("umi99;size=2;"), Some(2));
/// assert_eq!(cluster_size("umi99;size=0;"), None);
/// assert_eq!(cluster_size("umi99"), None);
/// ```
#[must_use]
pub fn cluster_size(canonical_umi: &str) -> Option<u64> {
    let start = canonical_umi.rfind("size=")? + "size=".len();
    let rest = &canonical_umi[start..];
    let digits = match rest.find(';') {
        Some(end) => &rest[..end],
        None => rest,
    };
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(size) => Some(size),
    }
}

/// One bin's cluster-ratio classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterRatio {
    /// Raw bin size divided by cluster size; `None` when the cluster size was
    /// absent or zero (no division is attempted).
    pub ratio: Option<f64>,
    /// Filter state.
    pub state: BcrState,
}

/// Classifies a bin from its raw (pre-subsample) read count.
///
/// A missing or zero cluster size fails outright rather than dividing.
#[must_use]
pub fn classify(canonical_umi: &str, raw_count: u64, max_ratio: f64) -> ClusterRatio {
    let Some(size) = cluster_size(canonical_umi) else {
        return ClusterRatio { ratio: None, state: BcrState::Fail };
    };
    let ratio = raw_count as f64 / size as f64;
    let state = if ratio <= max_ratio { BcrState::Ok } else { BcrState::Fail };
    ClusterRatio { ratio: Some(ratio), state }
}
