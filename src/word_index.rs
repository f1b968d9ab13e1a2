//! Loading and indexing of the wordlist the engine searches.
//!
//! This module is responsible for reading a wordlist (either from a file, or from an
//! in-memory string) and building the three read-only views every matcher relies on:
//!
//! - `words`: the full sorted list (duplicates from the source are kept);
//! - `by_length`: length → sorted words of that length, used to prune candidate scans;
//! - `members`: a set used for O(1) membership checks when reconstructing equation words.
//!
//! The parsing logic:
//! - Each line is trimmed and lowercased.
//! - Lines that are empty or not entirely ASCII-alphabetic are skipped silently.
//! - The final list and every length bucket are sorted, so all candidate scans are
//!   deterministic (ascending length, then alphabetical within a bucket).
//!
//! An index is built once and never mutated mid-query. Any number of concurrent
//! queries may share one index without locking; per-query state (pattern cache,
//! deadline) lives elsewhere.

use std::collections::{BTreeMap, HashSet};

/// Immutable, indexed view of a wordlist.
///
/// All three structures agree by construction: every word in `words` appears in
/// `by_length[word.len()]` and in `members`.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    /// All accepted words, sorted alphabetically. Duplicates in the source survive.
    pub words: Vec<String>,
    /// Length → sorted words of exactly that length.
    ///
    /// A `BTreeMap` rather than a `HashMap` so that iterating buckets (the
    /// unbounded-anagram scan) visits lengths in ascending order every run.
    by_length: BTreeMap<usize, Vec<String>>,
    /// Membership set for reconstructed-word lookups.
    members: HashSet<String>,
}

impl WordIndex {
    /// Build an index from an in-memory wordlist, one word per line.
    ///
    /// # Behavior
    /// 1. Trims and lowercases each line.
    /// 2. Keeps only non-empty, entirely ASCII-alphabetic lines.
    /// 3. Sorts the full list and each length bucket.
    ///
    /// An input with no usable lines yields an empty index; the dispatcher
    /// refuses to run queries against one.
    pub fn parse_from_str(contents: &str) -> WordIndex {
        let mut words: Vec<String> = contents
            .lines()
            .filter_map(|raw_line| {
                let word = raw_line.trim().to_lowercase();
                if !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()) {
                    Some(word)
                } else {
                    None
                }
            })
            .collect();

        words.sort();

        let mut by_length: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut members = HashSet::with_capacity(words.len());
        for word in &words {
            by_length.entry(word.len()).or_default().push(word.clone());
            members.insert(word.clone());
        }
        // Buckets inherit sortedness from `words`, which was sorted before the split.

        WordIndex { words, by_length, members }
    }

    /// Read a wordlist from a file path and index it.
    ///
    /// # Errors
    ///
    /// Will return an `Error` if unable to read a file at `path`. Callers that
    /// must not fail (e.g. the CLI falling back to "nothing loaded") should use
    /// [`WordIndex::load_or_empty`].
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<WordIndex> {
        let path_ref = path.as_ref();

        let data = std::fs::read_to_string(path_ref).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to read wordlist from '{}': {}", path_ref.display(), e),
            )
        })?;

        Ok(Self::parse_from_str(&data))
    }

    /// Like [`WordIndex::load_from_path`], but a missing or unreadable source
    /// yields an empty index instead of an error. The failure is logged; the
    /// dispatcher then reports "no wordlist loaded" on the first query.
    pub fn load_or_empty<P: AsRef<std::path::Path>>(path: P) -> WordIndex {
        match Self::load_from_path(path) {
            Ok(index) => index,
            Err(e) => {
                log::error!("{e}");
                WordIndex::default()
            }
        }
    }

    /// Number of words in the index (duplicates counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if no words were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The sorted bucket of words of exactly `len`, empty if none.
    #[must_use]
    pub fn bucket(&self, len: usize) -> &[String] {
        self.by_length.get(&len).map_or(&[], Vec::as_slice)
    }

    /// Iterate `(length, bucket)` pairs in ascending length order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.by_length.iter().map(|(&len, words)| (len, words.as_slice()))
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.members.contains(word)
    }
}
