//! Simple (non-anagram) pattern matching over the word index.
//!
//! A search clause may carry a length prefix, `N:` for an exact length or
//! `N-M:` for a range, which both prunes the candidate scan to the matching
//! length buckets and is stripped before the residual pattern is compiled.
//! Malformed prefixes (zero, or max < min) yield a diagnostic and the clause
//! is treated as unconstrained.

use crate::deadline::{Deadline, SIMPLE_SCAN_CHECK_INTERVAL};
use crate::errors::{Diagnostic, QueryError};
use crate::pattern::{regex_matches, PatternCache};
use crate::word_index::WordIndex;
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Matches an exact length prefix like `4:p*n`.
static EXACT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(.*)$").unwrap());

/// Matches a range length prefix like `3-5:p*n`.
static RANGE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+):(.*)$").unwrap());

/// Recognize and strip an optional length prefix from a full search clause.
///
/// Returns the `(min, max)` constraint and the residual pattern. A malformed
/// prefix (length 0, inverted range, or an unparseable number) records a
/// diagnostic and leaves the clause unconstrained and unstripped, matching
/// how the rest of the clause is then taken at face value.
pub(crate) fn parse_length_prefix<'a>(
    clause: &'a str,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Option<(usize, usize)>, &'a str) {
    // exact form first: `N:`; the range form would not match it anyway,
    // but the order mirrors how the prefixes are documented
    if let Some(cap) = EXACT_PREFIX_RE.captures(clause).unwrap_or(None) {
        let rest = cap.get(2).map_or("", |m| m.as_str());
        if let Ok(len) = cap[1].parse::<usize>() {
            if len > 0 {
                return (Some((len, len)), rest);
            }
        }
        let diagnostic = Diagnostic::InvalidLengthPrefix { clause: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return (None, clause);
    }

    if let Some(cap) = RANGE_PREFIX_RE.captures(clause).unwrap_or(None) {
        let rest = cap.get(3).map_or("", |m| m.as_str());
        if let (Ok(min), Ok(max)) = (cap[1].parse::<usize>(), cap[2].parse::<usize>()) {
            if min > 0 && min <= max {
                return (Some((min, max)), rest);
            }
        }
        let diagnostic = Diagnostic::InvalidLengthPrefix { clause: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return (None, clause);
    }

    (None, clause)
}

/// Match one word against one pattern, optionally length-constrained.
///
/// The length constraint is applied before the `*`-matches-everything and
/// empty-pattern shortcuts, so `*` under an exact-length constraint still
/// filters by length.
pub(crate) fn matches_pattern(
    word: &str,
    pattern: &str,
    length_constraint: Option<(usize, usize)>,
    cache: &mut PatternCache,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    if let Some((min_len, max_len)) = length_constraint {
        if word.len() < min_len || word.len() > max_len {
            return false;
        }
    }

    if pattern == "*" {
        return true;
    }
    if pattern.is_empty() {
        return word.is_empty();
    }

    match cache.get_or_compile(pattern, diagnostics) {
        Some(re) => regex_matches(&re, word),
        None => false, // bad pattern rejects everything
    }
}

/// Scan the index for all words matching a simple search clause.
///
/// Candidates come from the length buckets when a prefix constrains the
/// length, otherwise from the full sorted list; the deadline is re-checked
/// every [`SIMPLE_SCAN_CHECK_INTERVAL`] words.
///
/// # Errors
/// Returns [`QueryError::Timeout`] if the deadline expires mid-scan.
pub(crate) fn find_matches(
    clause: &str,
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<String>, QueryError> {
    let (length_constraint, pattern) = parse_length_prefix(clause, diagnostics);

    let candidates: Vec<&String> = match length_constraint {
        Some((min_len, max_len)) => (min_len..=max_len)
            .flat_map(|len| index.bucket(len))
            .collect(),
        None => index.words.iter().collect(),
    };

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    // Compile once, reuse against every candidate.
    let Some(re) = cache.get_or_compile(pattern, diagnostics) else {
        return Ok(Vec::new());
    };

    let mut matches = Vec::new();
    for (i, word) in candidates.into_iter().enumerate() {
        if i % SIMPLE_SCAN_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        if regex_matches(&re, word) {
            matches.push(word.clone());
        }
    }

    Ok(matches)
}
