//! String interning for UMI and read identifiers.
//!
//! Candidate indices hold one entry per alignment hit, and inputs run to tens
//! of millions of hits. Keying those maps by `String` would duplicate every
//! identifier once per hit, so identifiers are interned once into dense `u32`
//! ids and all downstream tables are integer-keyed. Ids are assigned in
//! first-seen order, which doubles as a deterministic traversal order.

use ahash::AHashMap;

/// A dense id for an interned UMI reference name (raw, possibly `_rc`-suffixed).
pub type UmiId = u32;

/// A dense id for an interned read name.
pub type ReadId = u32;

/// An interner mapping strings to dense `u32` ids and back.
#[derive(Debug, Default)]
pub struct StringInterner {
    ids: AHashMap<String, u32>,
    names: Vec<String>,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its id. Ids are dense and assigned in
    /// first-seen order starting from 0.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Looks up the id for `name` without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Resolves an id back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    /// Number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the interner is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        0..self.names.len() as u32
    }
}

/// The shared symbol tables for one binning run.
///
/// UMI names and read names live in separate id spaces; both per-end candidate
/// indices share this table so that ids are directly comparable across ends.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Raw UMI reference names (canonical and `_rc` forms are distinct entries).
    pub umis: StringInterner,
    /// Read names.
    pub reads: StringInterner,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
