//! Per-end candidate indices.
//!
//! A [`CandidateIndex`] records, for one read end, every (UMI reference, read)
//! pair observed in that end's SAM file together with the alignment edit
//! distance. Identifiers are interned through the shared [`SymbolTable`] so
//! the index is a compact integer-keyed table.

use anyhow::Result;
use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;

use crate::progress::ProgressTracker;
use crate::sam::SamHitReader;
use crate::symbols::{ReadId, SymbolTable, UmiId};

/// One end's candidate map: UMI reference → read → edit distance.
///
/// Retention rule: the first edit distance inserted for a (umi, read) pair is
/// kept. Primary hits are inserted before the same record's secondaries, so a
/// read that is both the record's primary target and duplicated in its `XA`
/// list keeps the primary alignment's distance, and the order of `XA` items
/// within a record cannot change what is retained.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    by_umi: AHashMap<UmiId, AHashMap<ReadId, u32>>,
    hits: u64,
    records: u64,
    skipped: u64,
}

impl CandidateIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a SAM file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P, symbols: &mut SymbolTable) -> Result<Self> {
        let mut reader = SamHitReader::from_path(path)?;
        Self::from_reader(&mut reader, symbols)
    }

    /// Builds the index by draining a [`SamHitReader`].
    pub fn from_reader<R: BufRead>(
        reader: &mut SamHitReader<R>,
        symbols: &mut SymbolTable,
    ) -> Result<Self> {
        Self::from_reader_with_progress(reader, symbols, None)
    }

    /// Builds the index by draining a [`SamHitReader`], ticking `progress`
    /// once per consumed record.
    pub fn from_reader_with_progress<R: BufRead>(
        reader: &mut SamHitReader<R>,
        symbols: &mut SymbolTable,
        progress: Option<&ProgressTracker>,
    ) -> Result<Self> {
        let mut index = Self::new();
        while let Some(hits) = reader.next_record()? {
            let umi = symbols.umis.intern(hits.umi);
            let read = symbols.reads.intern(hits.read);
            index.insert(umi, read, hits.nm);
            for sec in &hits.secondaries {
                let sec_read = symbols.reads.intern(sec.read);
                index.insert(umi, sec_read, sec.nm);
            }
            if let Some(tracker) = progress {
                tracker.log_if_needed(1);
            }
        }
        if let Some(tracker) = progress {
            tracker.log_final();
        }
        index.records = reader.records();
        index.skipped = reader.skipped();
        Ok(index)
    }

    /// Inserts a hit, keeping the first edit distance seen for the pair.
    pub fn insert(&mut self, umi: UmiId, read: ReadId, err: u32) {
        self.hits += 1;
        self.by_umi.entry(umi).or_default().entry(read).or_insert(err);
    }

    /// The retained edit distance for a (umi, read) pair, if any.
    #[must_use]
    pub fn err(&self, umi: UmiId, read: ReadId) -> Option<u32> {
        self.by_umi.get(&umi).and_then(|reads| reads.get(&read)).copied()
    }

    /// The read→err map for one UMI reference, if any hits were recorded.
    #[must_use]
    pub fn reads_of(&self, umi: UmiId) -> Option<&AHashMap<ReadId, u32>> {
        self.by_umi.get(&umi)
    }

    /// Whether the index holds any hits for `umi`.
    #[must_use]
    pub fn contains_umi(&self, umi: UmiId) -> bool {
        self.by_umi.contains_key(&umi)
    }

    /// Number of distinct UMI references with at least one hit.
    #[must_use]
    pub fn umi_count(&self) -> usize {
        self.by_umi.len()
    }

    /// Total hits offered to the index (before first-wins deduplication).
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits
    }

    /// SAM records consumed while building this index.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Malformed SAM data lines skipped while building this index.
    #[must_use]
    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }
}
