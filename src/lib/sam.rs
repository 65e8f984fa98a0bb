//! Streaming parser for SAM tabular alignment files.
//!
//! The binning inputs are plain-text SAM files produced by aligning the UMI
//! reference catalog against the UMI regions of every read. Only three pieces
//! of each record matter here: the query name (the UMI reference), the
//! reference name (the read), and two optional tags:
//!
//! - `NM:i:<int>` - the primary alignment's edit distance
//! - `XA:Z:ref,pos,cigar,nm;...` - packed secondary alignments; the first
//!   character of `pos` is the strand
//!
//! A record expands to one primary hit plus one hit per forward-strand (`+`)
//! secondary alignment. Header lines (`@`), records with fewer than 11 fields,
//! records without a parseable `NM` tag, and records with a malformed `XA`
//! item are skipped silently; upstream aligners emit heterogeneous SAM content
//! and a single bad record must not abort a multi-million-record run.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Minimum number of tab-separated fields in a SAM data record.
const MIN_SAM_FIELDS: usize = 11;

/// One secondary alignment of the record's UMI reference onto another read.
///
/// Only forward-strand secondaries are represented; reverse-strand `XA` items
/// are dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryHit<'a> {
    /// Read the UMI reference also aligned to.
    pub read: &'a str,
    /// Edit distance of the secondary alignment.
    pub nm: u32,
}

/// All hits carried by one SAM record: the primary alignment plus any
/// forward-strand secondaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHits<'a> {
    /// Query name: the raw UMI reference id (canonical or `_rc`-suffixed).
    pub umi: &'a str,
    /// Reference name: the read the UMI reference aligned to.
    pub read: &'a str,
    /// Primary alignment edit distance (`NM:i:` tag).
    pub nm: u32,
    /// Forward-strand secondary hits from the `XA:Z:` tag.
    pub secondaries: Vec<SecondaryHit<'a>>,
}

/// Parses one SAM data line into its hits.
///
/// Returns `None` for anything that should be skipped: header lines, short
/// records, records without `NM:i:`, and records whose `XA:Z:` list contains a
/// malformed item.
#[must_use]
pub fn parse_record(line: &str) -> Option<RecordHits<'_>> {
    if line.is_empty() || line.starts_with('@') {
        return None;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_SAM_FIELDS {
        return None;
    }

    let umi = fields[0];
    let read = fields[2];

    let mut nm: Option<u32> = None;
    let mut xa: Option<&str> = None;
    for field in &fields[MIN_SAM_FIELDS..] {
        if let Some(value) = field.strip_prefix("NM:i:") {
            nm = Some(value.parse().ok()?);
        } else if let Some(value) = field.strip_prefix("XA:Z:") {
            xa = Some(value);
        }
    }
    let nm = nm?;

    let secondaries = match xa {
        Some(list) => parse_xa_list(list)?,
        None => Vec::new(),
    };

    Some(RecordHits { umi, read, nm, secondaries })
}

/// Parses an `XA:Z:` value: a `;`-terminated list of `ref,pos,cigar,nm`
/// quadruples. Keeps forward-strand items only; returns `None` if any item is
/// malformed.
fn parse_xa_list(list: &str) -> Option<Vec<SecondaryHit<'_>>> {
    let mut secondaries = Vec::new();
    for item in list.split(';') {
        if item.is_empty() {
            // The list is ';'-terminated, so the final split piece is empty.
            continue;
        }
        let mut parts = item.split(',');
        let read = parts.next()?;
        let pos = parts.next()?;
        let _cigar = parts.next()?;
        let nm: u32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || read.is_empty() {
            return None;
        }
        match pos.chars().next()? {
            '+' => secondaries.push(SecondaryHit { read, nm }),
            '-' => {}
            _ => return None,
        }
    }
    Some(secondaries)
}

/// A streaming reader over a SAM text file yielding [`RecordHits`].
///
/// Reads one line at a time into an internal buffer; skipped lines are counted
/// but otherwise ignored.
///
/// # Example
///
/// ```no_run
/// use umibin_lib::sam::SamHitReader;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut reader = SamHitReader::from_path("umi1_map.sam")?;
/// while let Some(hits) = reader.next_record()? {
///     println!("{} -> {} (NM {})", hits.umi, hits.read, hits.nm);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SamHitReader<R: BufRead> {
    reader: R,
    line: String,
    records: u64,
    skipped: u64,
}

impl SamHitReader<BufReader<File>> {
    /// Opens a SAM file for streaming.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .with_context(|| format!("Failed to open SAM file: {}", path_ref.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SamHitReader<R> {
    /// Wraps an existing buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), records: 0, skipped: 0 }
    }

    /// Returns the hits of the next parseable record, or `None` at EOF.
    ///
    /// Malformed data lines are skipped and counted; header lines and blank
    /// lines are skipped without counting.
    pub fn next_record(&mut self) -> io::Result<Option<RecordHits<'_>>> {
        // The returned hits borrow `self.line`, so the borrow must begin only
        // after the line buffer has stopped changing; hence the parse inside
        // the loop only tests validity and the record is re-parsed on exit.
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            while self.line.ends_with('\n') || self.line.ends_with('\r') {
                self.line.pop();
            }
            if self.line.is_empty() || self.line.starts_with('@') {
                continue;
            }
            if parse_record(&self.line).is_some() {
                break;
            }
            self.skipped += 1;
        }
        self.records += 1;
        Ok(parse_record(&self.line))
    }

    /// Number of records yielded so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Number of malformed data lines skipped so far.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
