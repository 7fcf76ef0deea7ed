//! Mapping table construction and lookup.
//!
//! The builder validates textual pairs; `build` encodes them once through the
//! modified UTF-8 codec so the rewriter's hot loop compares plain byte slices
//! without revalidating. The built table is immutable and freely sharable
//! across threads; the builder itself is bound to the thread that created it.

use std::thread::{self, ThreadId};

use crate::classfile::mutf8;
use crate::common::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct MappingEntry {
    pub(crate) from: Vec<u8>,
    pub(crate) to: Vec<u8>,
}

/// Immutable set of `(from, to)` byte replacements.
///
/// Invariant: no `from` is a substring of another `from`, so at any scan
/// position at most one entry can match.
#[derive(Debug, Clone)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    min_from_len: usize,
}

impl MappingTable {
    pub fn builder() -> MappingBuilder {
        MappingBuilder::new()
    }

    /// Number of mapping entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Length of the shortest `from` sequence; scan loops prune on it
    pub(crate) fn min_from_len(&self) -> usize {
        self.min_from_len
    }

    /// Index of the entry whose `from` matches `bytes` at `at`, bounded by
    /// `end`. The no-overlap invariant makes the first hit the only hit.
    pub(crate) fn match_at(&self, bytes: &[u8], at: usize, end: usize) -> Option<usize> {
        for (index, entry) in self.entries.iter().enumerate() {
            let from = entry.from.as_slice();
            if end - at < from.len() {
                continue;
            }
            if &bytes[at..at + from.len()] == from {
                return Some(index);
            }
        }
        None
    }
}

/// Single-use, thread-bound builder for [`MappingTable`]
#[derive(Debug)]
pub struct MappingBuilder {
    owner: ThreadId,
    pairs: Vec<(String, String)>,
    built: bool,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self {
            owner: thread::current().id(),
            pairs: Vec::new(),
            built: false,
        }
    }

    fn check_usable(&self) -> Result<()> {
        if thread::current().id() != self.owner {
            return Err(Error::ForeignThread);
        }
        if self.built {
            return Err(Error::builder_state("builder already spent by build()"));
        }
        Ok(())
    }

    /// Add one textual mapping pair. Rejects empty text and any pair whose
    /// `from` contains, or is contained in, an already-added `from`; on
    /// rejection previously added pairs are preserved.
    pub fn add(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        self.check_usable()?;
        if from.is_empty() || to.is_empty() {
            return Err(Error::invalid_mapping("empty mapping text"));
        }
        for (existing, _) in &self.pairs {
            if existing.contains(from) || from.contains(existing) {
                return Err(Error::invalid_mapping(format!(
                    "'{from}' overlaps existing mapping key '{existing}'"
                )));
            }
        }
        self.pairs.push((from.to_owned(), to.to_owned()));
        Ok(self)
    }

    /// Freeze the added pairs into an immutable table. Requires at least one
    /// pair; spends the builder.
    pub fn build(&mut self) -> Result<MappingTable> {
        self.check_usable()?;
        if self.pairs.is_empty() {
            return Err(Error::builder_state("no mappings added"));
        }
        self.built = true;

        let mut entries = Vec::with_capacity(self.pairs.len());
        let mut min_from_len = usize::MAX;
        for (from, to) in &self.pairs {
            let entry = MappingEntry {
                from: mutf8::encode(from),
                to: mutf8::encode(to),
            };
            min_from_len = min_from_len.min(entry.from.len());
            entries.push(entry);
        }
        Ok(MappingTable { entries, min_from_len })
    }
}

impl Default for MappingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
