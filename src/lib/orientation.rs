//! Read-orientation balance filtering.
//!
//! A genuine molecule is read from both strands, so the reads of a real bin
//! carry a mix of the canonical UMI and its reverse-complemented form (`_rc`
//! suffix). Bins where one strand is (almost) absent are artefact signatures.
//!
//! The raw UMI name splits into a canonical name (trailing `_rc` stripped) and
//! a strand label. Per canonical bin the strand counts decide one of three
//! states, and for imbalanced-but-salvageable bins a per-strand quota caps how
//! many reads survive into the downstream statistics.

use serde::{Deserialize, Serialize};

/// Suffix marking a reverse-complement-oriented UMI reference.
pub const RC_SUFFIX: &str = "_rc";

/// Which strand a read's UMI match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    /// Canonical orientation.
    Plus,
    /// Reverse-complement orientation (`_rc`-suffixed reference).
    Minus,
}

impl Strand {
    /// The conventional `+`/`-` symbol.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

/// Read-orientation filter state for one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RorState {
    /// Minority-strand fraction meets the target; bin kept in full.
    #[serde(rename = "rof_ok")]
    Ok,
    /// Imbalanced; both strands capped, bin excluded from emission.
    #[serde(rename = "rof_subset")]
    Subset,
    /// One strand has at most one read; no balance is possible.
    #[serde(rename = "rof_fail")]
    Fail,
}

/// Splits a raw UMI name into its canonical form and strand.
///
/// Only a trailing `_rc` marks the minus strand; the suffix elsewhere in the
/// name is part of the name.
///
/// # Example
///
/// ```
/// use umibin_lib::orientation::{split_orientation, Strand};
///
/// assert_eq!(split_orientation("umi7;size=3;_rc"), ("umi7;size=3;", Strand::Minus));
/// assert_eq!(split_orientation("umi7;size=3;"), ("umi7;size=3;", Strand::Plus));
/// ```
#[must_use]
pub fn split_orientation(raw: &str) -> (&str, Strand) {
    match raw.strip_suffix(RC_SUFFIX) {
        Some(canonical) => (canonical, Strand::Minus),
        None => (raw, Strand::Plus),
    }
}

/// One bin's orientation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationSummary {
    /// Reads matching the canonical orientation.
    pub plus: u64,
    /// Reads matching the reverse-complement orientation.
    pub neg: u64,
    /// Survival cap for the plus strand.
    pub plus_cap: u64,
    /// Survival cap for the minus strand.
    pub neg_cap: u64,
    /// Filter state.
    pub state: RorState,
}

impl OrientationSummary {
    /// Fraction of reads on the minority strand (0 when the bin is empty).
    #[must_use]
    pub fn minority_fraction(&self) -> f64 {
        let total = self.plus + self.neg;
        if total == 0 {
            return 0.0;
        }
        self.plus.min(self.neg) as f64 / total as f64
    }
}

/// Classifies a bin's strand counts.
///
/// - `plus <= 1` or `neg <= 1` is a failure: both caps are zero and nothing
///   survives.
/// - A minority fraction of at least `ro_frac` passes: both caps are
///   `max_bin_size`, which in practice retains every read.
/// - Otherwise the bin is subsampled: both caps are set to
///   `trunc(major * (1/ro_frac - 1))`, derived from the majority side. The
///   minority side is by construction below that cap and is kept in full; the
///   sides are capped independently and the kept counts are not equalised.
#[must_use]
pub fn classify(plus: u64, neg: u64, ro_frac: f64, max_bin_size: u64) -> OrientationSummary {
    if plus <= 1 || neg <= 1 {
        return OrientationSummary { plus, neg, plus_cap: 0, neg_cap: 0, state: RorState::Fail };
    }

    let total = plus + neg;
    let minor = plus.min(neg) as f64 / total as f64;
    if minor >= ro_frac {
        return OrientationSummary {
            plus,
            neg,
            plus_cap: max_bin_size,
            neg_cap: max_bin_size,
            state: RorState::Ok,
        };
    }

    let major = plus.max(neg);
    let cap = (major as f64 * (1.0 / ro_frac - 1.0)) as u64;
    OrientationSummary { plus, neg, plus_cap: cap, neg_cap: cap, state: RorState::Subset }
}

/// Remaining per-strand quota for the subsampling pass.
///
/// Acceptance and decrement are a single operation, so one pass over the reads
/// in a deterministic order yields a deterministic survivor set.
#[derive(Debug, Clone, Copy)]
pub struct StrandQuota {
    plus_left: u64,
    neg_left: u64,
}

impl StrandQuota {
    /// Quota initialised from a bin's caps.
    #[must_use]
    pub fn new(summary: &OrientationSummary) -> Self {
        Self { plus_left: summary.plus_cap, neg_left: summary.neg_cap }
    }

    /// Takes one slot on `strand`; returns whether the read survives.
    pub fn try_take(&mut self, strand: Strand) -> bool {
        let left = match strand {
            Strand::Plus => &mut self.plus_left,
            Strand::Minus => &mut self.neg_left,
        };
        if *left == 0 {
            return false;
        }
        *left -= 1;
        true
    }
}
