//! Pipeline wiring: candidate indices in, report rows out.
//!
//! Data flows strictly forward through the stages of the binning engine:
//! resolve cross-end assignments, group by canonical UMI, classify and
//! subsample for orientation balance, accumulate match-error statistics,
//! classify the bin/cluster ratio, and collect the rows for the two reports.
//! No stage mutates the structures an earlier stage produced.

use ahash::AHashMap;

use crate::candidates::CandidateIndex;
use crate::cluster_ratio::{self, BcrState};
use crate::error_stats::{ErrorStats, UmeState};
use crate::metrics::binning::{BinAssignment, UmiBinningStats};
use crate::orientation::{self, RorState, Strand, StrandQuota};
use crate::resolver::{resolve, MatchThresholds};
use crate::symbols::{ReadId, SymbolTable};

/// All thresholds for one binning run.
#[derive(Debug, Clone, Copy)]
pub struct BinningConfig {
    /// Maximum edit distance allowed on either read end.
    pub per_umi_max: u32,
    /// Maximum summed edit distance across both ends.
    pub combined_max: u32,
    /// Per-bin mean combined-error cutoff.
    pub ume_mean_max: f64,
    /// Per-bin combined-error SD cutoff.
    pub ume_sd_max: f64,
    /// Minimum minority-strand fraction; must lie in `(0, 0.5]`.
    pub ro_frac: f64,
    /// Both strand caps for orientation-balanced bins.
    pub max_bin_size: u64,
    /// Maximum raw bin size / cluster size ratio.
    pub bin_cluster_ratio: f64,
}

/// Per-stage counts for the end-of-run summary log.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinningSummary {
    /// Distinct reads with candidate hits on both ends (pre-threshold).
    pub reads_with_both_ends: u64,
    /// Reads assigned to a UMI after resolution.
    pub reads_assigned: u64,
    /// Canonical bins with at least one assigned read.
    pub bins_total: u64,
    /// Bins rejected for strand imbalance.
    pub bins_rof_fail: u64,
    /// Bins subsampled (and thereby excluded from emission).
    pub bins_rof_subset: u64,
    /// Bins rejected by the match-error statistics.
    pub bins_ume_fail: u64,
    /// Bins rejected by the bin/cluster ratio.
    pub bins_bcr_fail: u64,
    /// Bins whose reads reached the bin map.
    pub bins_emitted: u64,
    /// Reads written to the bin map.
    pub reads_emitted: u64,
}

/// The rows of both reports plus the run summary.
#[derive(Debug, Default)]
pub struct BinningOutput {
    /// Stats rows, sorted by canonical UMI name.
    pub stats: Vec<UmiBinningStats>,
    /// Bin-map rows, grouped by bin in stats order, reads in id order.
    pub bin_map: Vec<BinAssignment>,
    /// Per-stage counts.
    pub summary: BinningSummary,
}

/// Accumulated state for one canonical bin.
#[derive(Debug, Default)]
struct BinState {
    plus: u64,
    neg: u64,
    /// Survivors of the orientation subsample, in ascending read-id order.
    survivors: Vec<(ReadId, u32)>,
    errors: ErrorStats,
}

/// Runs the full binning engine over the two per-end candidate indices.
///
/// Every traversal that can reach the output is id-ordered or name-sorted, so
/// repeated runs over the same inputs produce byte-identical reports.
#[must_use]
pub fn bin_reads(
    index1: &CandidateIndex,
    index2: &CandidateIndex,
    symbols: &SymbolTable,
    config: &BinningConfig,
) -> BinningOutput {
    log::info!("Filtering read matches across UMI ends");
    let thresholds =
        MatchThresholds { per_umi_max: config.per_umi_max, combined_max: config.combined_max };
    let assignments = resolve(index1, index2, symbols, &thresholds);
    let assigned = assignments.sorted();

    // Group by canonical UMI; bin indices are handed out in first-appearance
    // order over the id-sorted reads.
    let mut bin_of_name: AHashMap<String, usize> = AHashMap::new();
    let mut bin_names: Vec<String> = Vec::new();
    let mut bins: Vec<BinState> = Vec::new();
    let mut read_bins: Vec<(ReadId, usize, Strand, u32)> = Vec::with_capacity(assigned.len());

    for &(read, assignment) in &assigned {
        let raw_name = symbols.umis.resolve(assignment.umi);
        let (canonical, strand) = orientation::split_orientation(raw_name);
        let bin = match bin_of_name.get(canonical) {
            Some(&idx) => idx,
            None => {
                let idx = bins.len();
                bin_of_name.insert(canonical.to_string(), idx);
                bin_names.push(canonical.to_string());
                bins.push(BinState::default());
                idx
            }
        };
        match strand {
            Strand::Plus => bins[bin].plus += 1,
            Strand::Minus => bins[bin].neg += 1,
        }
        read_bins.push((read, bin, strand, assignment.combined_err));
    }

    // Orientation classification, then one id-ordered pass filling each bin's
    // strand quotas; acceptance and quota decrement are atomic per read.
    log::info!("Filtering read orientation");
    let orientations: Vec<orientation::OrientationSummary> = bins
        .iter()
        .map(|b| orientation::classify(b.plus, b.neg, config.ro_frac, config.max_bin_size))
        .collect();
    let mut quotas: Vec<StrandQuota> = orientations.iter().map(StrandQuota::new).collect();

    for &(read, bin, strand, err) in &read_bins {
        if quotas[bin].try_take(strand) {
            bins[bin].survivors.push((read, err));
            bins[bin].errors.add(err);
        }
    }

    // Classify the remaining filters and assemble rows in name-sorted order.
    log::info!("Filtering UMI match error and bin/cluster ratio");
    let mut order: Vec<usize> = (0..bins.len()).collect();
    order.sort_unstable_by(|&a, &b| bin_names[a].cmp(&bin_names[b]));

    let mut output = BinningOutput {
        summary: BinningSummary {
            reads_with_both_ends: assignments.reads_with_both_ends,
            reads_assigned: assigned.len() as u64,
            bins_total: bins.len() as u64,
            ..BinningSummary::default()
        },
        ..BinningOutput::default()
    };

    for bin in order {
        let name = &bin_names[bin];
        let state = &bins[bin];
        let ror = &orientations[bin];
        let raw_n = state.plus + state.neg;
        let filt_n = state.survivors.len() as u64;

        let (ume_mean, ume_sd, ume_state, bcr) = if filt_n > 0 {
            let ume_state = state.errors.classify(config.ume_mean_max, config.ume_sd_max);
            let bcr = cluster_ratio::classify(name, raw_n, config.bin_cluster_ratio);
            (Some(state.errors.mean()), Some(state.errors.sd()), Some(ume_state), Some(bcr))
        } else {
            (None, None, None, None)
        };

        match ror.state {
            RorState::Fail => output.summary.bins_rof_fail += 1,
            RorState::Subset => output.summary.bins_rof_subset += 1,
            RorState::Ok => {}
        }
        if ume_state == Some(UmeState::Fail) {
            output.summary.bins_ume_fail += 1;
        }
        if bcr.map(|b| b.state) == Some(BcrState::Fail) {
            output.summary.bins_bcr_fail += 1;
        }

        let emitted = ror.state == RorState::Ok
            && ume_state == Some(UmeState::Ok)
            && bcr.map(|b| b.state) == Some(BcrState::Ok);
        if emitted {
            output.summary.bins_emitted += 1;
            output.summary.reads_emitted += filt_n;
            for &(read, err) in &state.survivors {
                output.bin_map.push(BinAssignment {
                    umi_name: name.clone(),
                    read_name: symbols.reads.resolve(read).to_string(),
                    combined_err: err,
                });
            }
        }

        output.stats.push(UmiBinningStats {
            umi_name: name.clone(),
            read_n_raw: raw_n,
            read_n_filt: filt_n,
            read_n_plus: state.plus,
            read_n_neg: state.neg,
            read_max_plus: ror.plus_cap + state.plus,
            read_max_neg: ror.neg_cap + state.neg,
            read_orientation_ratio: ror.minority_fraction(),
            ror_filter: ror.state,
            umi_match_error_mean: ume_mean,
            umi_match_error_sd: ume_sd,
            ume_filter: ume_state,
            bin_cluster_ratio: bcr.and_then(|b| b.ratio),
            bcr_filter: bcr.map(|b| b.state),
        });
    }

    output
}
