//! Cross-end assignment resolution.
//!
//! A read is only trustworthy evidence for a UMI when both of its ends matched
//! the same UMI reference. The resolver intersects the two per-end candidate
//! indices, applies the per-end and combined edit-distance thresholds, and
//! settles conflicts where a read matched several UMI references (including a
//! reference and its `_rc` twin, which are distinct keys at this stage) by
//! keeping the proposal with the smallest combined distance.

use ahash::AHashMap;

use crate::candidates::CandidateIndex;
use crate::symbols::{ReadId, SymbolTable, UmiId};

/// Edit-distance admission thresholds.
#[derive(Debug, Clone, Copy)]
pub struct MatchThresholds {
    /// Maximum edit distance allowed on either end.
    pub per_umi_max: u32,
    /// Maximum summed edit distance across both ends.
    pub combined_max: u32,
}

/// A read's resolved UMI assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// The winning raw UMI reference (canonical or `_rc` form).
    pub umi: UmiId,
    /// Summed edit distance over both ends.
    pub combined_err: u32,
}

/// The resolved read → UMI map.
#[derive(Debug, Default)]
pub struct ReadAssignments {
    by_read: AHashMap<ReadId, Assignment>,
    /// Distinct reads that had evidence on both ends for at least one UMI,
    /// before thresholds were applied.
    pub reads_with_both_ends: u64,
}

impl ReadAssignments {
    /// The assignment for a read, if it survived resolution.
    #[must_use]
    pub fn get(&self, read: ReadId) -> Option<Assignment> {
        self.by_read.get(&read).copied()
    }

    /// Number of assigned reads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_read.len()
    }

    /// Whether no read was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_read.is_empty()
    }

    /// Assignments in ascending read-id order.
    ///
    /// Read ids are interned in first-appearance order, so this traversal is
    /// deterministic for a fixed pair of input files. All downstream passes
    /// that could leak iteration order into the output use it.
    #[must_use]
    pub fn sorted(&self) -> Vec<(ReadId, Assignment)> {
        let mut entries: Vec<(ReadId, Assignment)> =
            self.by_read.iter().map(|(&r, &a)| (r, a)).collect();
        entries.sort_unstable_by_key(|&(r, _)| r);
        entries
    }
}

/// Intersects the two candidate indices and resolves each read to at most one
/// UMI reference.
///
/// UMI references are visited in interning order and the reads under each in
/// ascending id order, so "first proposal seen" tie-breaking is well defined.
#[must_use]
pub fn resolve(
    index1: &CandidateIndex,
    index2: &CandidateIndex,
    symbols: &SymbolTable,
    thresholds: &MatchThresholds,
) -> ReadAssignments {
    let mut assignments = ReadAssignments::default();
    let mut seen_both: ahash::AHashSet<ReadId> = ahash::AHashSet::new();

    for umi in symbols.umis.ids() {
        let Some(reads1) = index1.reads_of(umi) else { continue };

        let mut read_ids: Vec<ReadId> = reads1.keys().copied().collect();
        read_ids.sort_unstable();

        for read in read_ids {
            let e1 = reads1[&read];
            let Some(e2) = index2.err(umi, read) else { continue };
            seen_both.insert(read);

            if e1 > thresholds.per_umi_max || e2 > thresholds.per_umi_max {
                continue;
            }
            let combined = e1 + e2;
            if combined > thresholds.combined_max {
                continue;
            }

            match assignments.by_read.entry(read) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(Assignment { umi, combined_err: combined });
                }
                std::collections::hash_map::Entry::Occupied(mut slot) => {
                    // Strictly smaller wins; ties keep the earlier proposal.
                    if combined < slot.get().combined_err {
                        slot.insert(Assignment { umi, combined_err: combined });
                    }
                }
            }
        }
    }

    assignments.reads_with_both_ends = seen_both.len() as u64;
    assignments
}
