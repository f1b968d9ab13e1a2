//! Anagram matching: clauses starting with `/`.
//!
//! `/letters` collects the alphabetic characters after the slash into a bag of
//! required letters. Each `.` demands exactly one additional unconstrained
//! letter; any `*` lifts the length ceiling entirely. A word matches when its
//! letter counts cover the required bag and its length fits the derived
//! bounds.

use crate::deadline::{Deadline, SCAN_CHECK_INTERVAL};
use crate::errors::QueryError;
use crate::word_index::WordIndex;
use std::collections::HashMap;

/// Count letters into a multiset.
fn letter_counts(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Scan the index for all words matching an anagram clause (leading `/`
/// included).
///
/// Candidate pruning uses the length buckets: the single exact bucket when no
/// `*` is present, otherwise every bucket of at least the minimum length.
///
/// # Errors
/// Returns [`QueryError::Timeout`] if the deadline expires mid-scan.
pub(crate) fn find_matches(
    clause: &str,
    index: &WordIndex,
    deadline: &Deadline,
) -> Result<Vec<String>, QueryError> {
    let content = clause.strip_prefix('/').unwrap_or(clause);

    let dots = content.chars().filter(|&c| c == '.').count();
    let unbounded = content.contains('*');
    let base: String = content.chars().filter(|c| c.is_alphabetic()).collect();
    let base_counts = letter_counts(&base);
    let min_len = base.len() + dots;

    // Exact bucket when bounded; every bucket of sufficient length otherwise.
    let candidates: Vec<&String> = if unbounded {
        index
            .buckets()
            .filter(|&(len, _)| len >= min_len)
            .flat_map(|(_, words)| words)
            .collect()
    } else {
        index.bucket(min_len).iter().collect()
    };

    let mut matches = Vec::new();
    for (i, word) in candidates.into_iter().enumerate() {
        if i % SCAN_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }

        // Superset test: the word must contain every required letter at least
        // as many times as the bag demands. Bounded candidates come from the
        // exact bucket, so "extras == dots" holds by construction.
        let word_counts = letter_counts(word);
        let covers = base_counts
            .iter()
            .all(|(c, &required)| word_counts.get(c).copied().unwrap_or(0) >= required);

        if covers {
            matches.push(word.clone());
        }
    }

    Ok(matches)
}
