//! Variable definitions and the equation solver.
//!
//! A variable definition clause has the shape `X=(min[-max]:pattern)` with
//! `X` in `A..=R`; the pattern defaults to `*` when empty. Search clauses in
//! an equation query must be pure sequences of variable references, each
//! optionally prefixed with `~` for reversal.
//!
//! Supported query structures:
//! - **one clause**: decompose each word of the combined length into
//!   consecutive fixed-length segments, one per reference, checking each
//!   (reversed if flagged) segment against its variable's subpattern;
//! - **two clauses, self-reverse pair** (`X;~X`): words whose reversal is a
//!   different word that also satisfies `X`, each unordered pair reported
//!   once;
//! - **two clauses, full sequence reversal** (`AB;BA`, `ABC;CBA`, ...):
//!   decompose per the first clause, reconstruct per the second, and keep the
//!   pair only when the reconstruction is itself in the wordlist.
//!
//! Anything else is rejected with a diagnostic and an empty result, never a
//! partial or best-effort one.

use crate::deadline::{Deadline, SCAN_CHECK_INTERVAL};
use crate::dispatch::MatchResult;
use crate::errors::{Diagnostic, QueryError};
use crate::matcher::matches_pattern;
use crate::pattern::PatternCache;
use crate::wf_char::WfChar;
use crate::word_index::WordIndex;
use fancy_regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

/// Matches a whole variable definition like `A=(3:#@#)` or `B=(2-4:*)`.
static VAR_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-R])=\((\d+)(?:-(\d+))?:(.*)\)$").unwrap());

/// Matches one variable reference, with its optional reversal marker.
static VAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~?[A-R]").unwrap());

/// A parsed variable definition, scoped to one query.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: char,
    pub min_len: usize,
    pub max_len: usize,
    /// Subpattern in the search mini-language; `*` when the definition left it empty.
    pub pattern: String,
}

impl VariableDefinition {
    fn has_exact_len(&self) -> bool {
        self.min_len == self.max_len
    }
}

/// One reference to a variable inside a search clause. The reversal marker is
/// captured here at parse time and never re-derived from the clause text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VarRef {
    pub(crate) name: char,
    pub(crate) reversed: bool,
}

/// A reference resolved against its definition, ready for decomposition.
#[derive(Debug, Clone)]
struct Segment {
    name: char,
    len: usize,
    pattern: String,
    reversed: bool,
}

/// Parse one definition clause. Malformed syntax or invalid lengths record a
/// diagnostic and yield `None`; the caller skips the clause and proceeds.
pub(crate) fn parse_variable_definition(
    clause: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<VariableDefinition> {
    let Some(cap) = VAR_DEF_RE.captures(clause).unwrap_or(None) else {
        let diagnostic = Diagnostic::InvalidVariableDefinition { definition: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return None;
    };

    let name = cap[1].chars().next()?;
    let min_len = cap[2].parse::<usize>().ok();
    let max_len = match cap.get(3) {
        Some(m) => m.as_str().parse::<usize>().ok(),
        None => min_len,
    };

    // a length too large for usize is invalid, same as 0 or an inverted range
    let (Some(min_len), Some(max_len)) = (min_len, max_len) else {
        let diagnostic = Diagnostic::InvalidDefinitionLengths { definition: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return None;
    };

    if min_len == 0 || max_len < min_len {
        let diagnostic = Diagnostic::InvalidDefinitionLengths { definition: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return None;
    }

    let pattern = match cap.get(4) {
        Some(m) if !m.as_str().is_empty() => m.as_str().to_string(),
        _ => "*".to_string(),
    };

    Some(VariableDefinition { name, min_len, max_len, pattern })
}

/// Parse a clause as a pure sequence of variable references.
///
/// Returns `None` when the clause contains anything besides references: the
/// references found are re-concatenated and compared against the clause with
/// its `~` markers removed, so stray literals or wildcards fail the check.
pub(crate) fn parse_var_refs(clause: &str) -> Option<Vec<VarRef>> {
    let mut refs = Vec::new();
    for m in VAR_REF_RE.find_iter(clause) {
        let m = m.ok()?;
        let text = m.as_str();
        let reversed = text.starts_with('~');
        let name = text.chars().last()?;
        refs.push(VarRef { name, reversed });
    }

    let reconstructed: String = refs.iter().map(|r| r.name).collect();
    let stripped: String = clause.chars().filter(|&c| c != '~').collect();
    if refs.is_empty() || reconstructed != stripped {
        return None;
    }

    Some(refs)
}

/// Resolve references against the definitions, requiring exact lengths.
///
/// `None` (with a diagnostic) when a reference is undefined or its variable
/// has a true length range; ranges are unsupported in decomposition.
fn resolve_segments(
    refs: &[VarRef],
    vars: &HashMap<char, VariableDefinition>,
    clause: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Vec<Segment>> {
    let mut segments = Vec::with_capacity(refs.len());
    for r in refs {
        let Some(def) = vars.get(&r.name) else {
            let diagnostic =
                Diagnostic::UndefinedVariable { name: r.name, clause: clause.to_string() };
            log::warn!("{}", diagnostic.display_detailed());
            diagnostics.push(diagnostic);
            return None;
        };
        if !def.has_exact_len() {
            let diagnostic = Diagnostic::RangeVariableUnsupported {
                name: r.name,
                min: def.min_len,
                max: def.max_len,
            };
            log::warn!("{}", diagnostic.display_detailed());
            diagnostics.push(diagnostic);
            return None;
        }
        segments.push(Segment {
            name: r.name,
            len: def.min_len,
            pattern: def.pattern.clone(),
            reversed: r.reversed,
        });
    }
    Some(segments)
}

/// Slice `word` into consecutive segments and validate each against its
/// variable's subpattern. The bound value is the segment *as tested*, i.e.
/// reversed when the reference carried `~`.
fn decompose(
    word: &str,
    segments: &[Segment],
    cache: &mut PatternCache,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BTreeMap<char, String>> {
    let mut bindings = BTreeMap::new();
    let mut pos = 0;
    for seg in segments {
        let part = &word[pos..pos + seg.len];
        let checked: String = if seg.reversed { part.chars().rev().collect() } else { part.to_string() };
        if !matches_pattern(&checked, &seg.pattern, Some((seg.len, seg.len)), cache, diagnostics) {
            return None;
        }
        bindings.insert(seg.name, checked);
        pos += seg.len;
    }
    Some(bindings)
}

/// Solve an equation query: the parsed variable definitions plus one or two
/// search clauses.
///
/// # Errors
/// Returns [`QueryError::Timeout`] if the deadline expires mid-scan. All
/// structural problems are diagnostics with an empty result, not errors.
pub(crate) fn solve(
    vars: &HashMap<char, VariableDefinition>,
    clauses: &[String],
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<MatchResult>, QueryError> {
    match clauses {
        [clause] => solve_single(clause, vars, index, cache, deadline, diagnostics),
        [first, second] => solve_pair(first, second, vars, index, cache, deadline, diagnostics),
        _ => {
            let diagnostic = Diagnostic::TooManyEquationClauses { count: clauses.len() };
            log::warn!("{}", diagnostic.display_detailed());
            diagnostics.push(diagnostic);
            Ok(Vec::new())
        }
    }
}

/// One clause: scan the bucket of the combined length and decompose.
fn solve_single(
    clause: &str,
    vars: &HashMap<char, VariableDefinition>,
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<MatchResult>, QueryError> {
    let Some(refs) = parse_var_refs(clause) else {
        let diagnostic = Diagnostic::UnsupportedEquationClause { clause: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return Ok(Vec::new());
    };
    let Some(segments) = resolve_segments(&refs, vars, clause, diagnostics) else {
        return Ok(Vec::new());
    };

    let total_len: usize = segments.iter().map(|s| s.len).sum();

    let mut results = Vec::new();
    for (i, word) in index.bucket(total_len).iter().enumerate() {
        if i % SCAN_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        if let Some(bindings) = decompose(word, &segments, cache, diagnostics) {
            results.push(MatchResult { primary: word.clone(), secondary: None, bindings });
        }
    }
    Ok(results)
}

/// A clause that is exactly one bare variable name.
fn as_single_var(clause: &str) -> Option<char> {
    let mut chars = clause.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_variable() => Some(c),
        _ => None,
    }
}

/// A clause that is exactly `~X`.
fn as_single_rev_var(clause: &str) -> Option<char> {
    as_single_var(clause.strip_prefix('~')?)
}

/// Two clauses: the self-reverse pair relation is tried first; the full
/// sequence reversal second. They are mutually exclusive; a pair that fits
/// neither is rejected whole.
fn solve_pair(
    first: &str,
    second: &str,
    vars: &HashMap<char, VariableDefinition>,
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<MatchResult>, QueryError> {
    // Relation 1: X;~X
    if let (Some(a), Some(b)) = (as_single_var(first), as_single_rev_var(second)) {
        if a == b {
            return solve_reverse_pair(a, first, vars, index, cache, deadline, diagnostics);
        }
    }

    // Relation 2: same reference sequence, reversed order
    let refs_pair = match (parse_var_refs(first), parse_var_refs(second)) {
        (Some(r1), Some(r2)) => Some((r1, r2)),
        _ => None,
    };
    if let Some((refs1, refs2)) = refs_pair {
        let names1: Vec<char> = refs1.iter().map(|r| r.name).collect();
        let mut names2_rev: Vec<char> = refs2.iter().map(|r| r.name).collect();
        names2_rev.reverse();
        if refs1.len() == refs2.len() && names1 == names2_rev {
            return solve_sequence_reversal(
                &refs1, &refs2, first, vars, index, cache, deadline, diagnostics,
            );
        }
    }

    let diagnostic = Diagnostic::UnrecognizedClausePair {
        first: first.to_string(),
        second: second.to_string(),
    };
    log::warn!("{}", diagnostic.display_detailed());
    diagnostics.push(diagnostic);
    Ok(Vec::new())
}

/// `X;~X`: every unordered pair of distinct words that are mutual reversals
/// and both satisfy `X`. Length ranges are allowed here since there is no
/// decomposition.
fn solve_reverse_pair(
    name: char,
    clause: &str,
    vars: &HashMap<char, VariableDefinition>,
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<MatchResult>, QueryError> {
    let Some(def) = vars.get(&name) else {
        let diagnostic = Diagnostic::UndefinedVariable { name, clause: clause.to_string() };
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return Ok(Vec::new());
    };

    // Collect every word in range satisfying the subpattern.
    let mut candidates = Vec::new();
    let mut scanned = 0usize;
    for len in def.min_len..=def.max_len {
        for word in index.bucket(len) {
            if scanned % SCAN_CHECK_INTERVAL == 0 {
                deadline.check()?;
            }
            scanned += 1;
            if matches_pattern(word, &def.pattern, Some((len, len)), cache, diagnostics) {
                candidates.push(word.clone());
            }
        }
    }

    let candidate_set: HashSet<&str> = candidates.iter().map(String::as_str).collect();
    let mut found_pairs: HashSet<(String, String)> = HashSet::new();
    let mut results = Vec::new();

    for (i, w1) in candidates.iter().enumerate() {
        if i % SCAN_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        let w2: String = w1.chars().rev().collect();
        if *w1 == w2 {
            continue; // a word equal to its own reverse never pairs with itself
        }
        if candidate_set.contains(w2.as_str()) {
            let pair = if *w1 < w2 { (w1.clone(), w2.clone()) } else { (w2.clone(), w1.clone()) };
            if found_pairs.insert(pair) {
                let bindings = BTreeMap::from([(name, w1.clone())]);
                results.push(MatchResult { primary: w1.clone(), secondary: Some(w2), bindings });
            }
        }
    }

    Ok(results)
}

/// Full sequence reversal: decompose `word1` per the first clause, rebuild
/// `word2` from the *decomposed* values per the second clause, and keep the
/// pair only if `word2` is in the wordlist.
#[allow(clippy::too_many_arguments)]
fn solve_sequence_reversal(
    refs1: &[VarRef],
    refs2: &[VarRef],
    first: &str,
    vars: &HashMap<char, VariableDefinition>,
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<MatchResult>, QueryError> {
    let Some(segments) = resolve_segments(refs1, vars, first, diagnostics) else {
        return Ok(Vec::new());
    };

    let total_len: usize = segments.iter().map(|s| s.len).sum();

    // Dedup keys on the full (sorted) binding map, and only fires when
    // word1 == word2; distinct binding variants for the same pair are kept
    // as separate results on purpose.
    let mut seen_bindings: HashSet<Vec<(char, String)>> = HashSet::new();
    let mut results = Vec::new();

    for (i, word1) in index.bucket(total_len).iter().enumerate() {
        if i % SCAN_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }

        let Some(bindings) = decompose(word1, &segments, cache, diagnostics) else {
            continue;
        };

        // Reconstruct word2 from the bound values, honoring each reference's
        // own reversal flag; flags are independent, never implied by position.
        let word2: String = refs2
            .iter()
            .map(|r| {
                let val = &bindings[&r.name];
                if r.reversed { val.chars().rev().collect::<String>() } else { val.clone() }
            })
            .collect();

        if !index.contains(&word2) {
            continue;
        }

        let key: Vec<(char, String)> =
            bindings.iter().map(|(&c, v)| (c, v.clone())).collect();
        if *word1 == word2 && seen_bindings.contains(&key) {
            continue;
        }
        seen_bindings.insert(key);

        results.push(MatchResult { primary: word1.clone(), secondary: Some(word2), bindings });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn far_deadline() -> Deadline {
        Deadline::new(Duration::from_secs(60))
    }

    fn defs(clauses: &[&str]) -> (HashMap<char, VariableDefinition>, Vec<Diagnostic>) {
        let mut vars = HashMap::new();
        let mut diagnostics = Vec::new();
        for clause in clauses {
            if let Some(def) = parse_variable_definition(clause, &mut diagnostics) {
                vars.insert(def.name, def);
            }
        }
        (vars, diagnostics)
    }

    fn run(
        def_clauses: &[&str],
        search_clauses: &[&str],
        words: &str,
    ) -> (Vec<MatchResult>, Vec<Diagnostic>) {
        let index = WordIndex::parse_from_str(words);
        let (vars, mut diagnostics) = defs(def_clauses);
        let mut cache = PatternCache::new();
        let clauses: Vec<String> = search_clauses.iter().map(ToString::to_string).collect();
        let results =
            solve(&vars, &clauses, &index, &mut cache, &far_deadline(), &mut diagnostics).unwrap();
        (results, diagnostics)
    }

    #[test]
    fn test_parse_definition_exact() {
        let mut diagnostics = Vec::new();
        let def = parse_variable_definition("A=(3:#@#)", &mut diagnostics).unwrap();
        assert_eq!(def, VariableDefinition {
            name: 'A',
            min_len: 3,
            max_len: 3,
            pattern: "#@#".to_string(),
        });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_definition_range_and_default_pattern() {
        let mut diagnostics = Vec::new();
        let def = parse_variable_definition("B=(2-4:)", &mut diagnostics).unwrap();
        assert_eq!(def.min_len, 2);
        assert_eq!(def.max_len, 4);
        assert_eq!(def.pattern, "*"); // empty pattern defaults to *
    }

    #[test]
    fn test_parse_definition_rejects_bad_shapes() {
        let mut diagnostics = Vec::new();
        assert!(parse_variable_definition("S=(3:*)", &mut diagnostics).is_none()); // S past R
        assert!(parse_variable_definition("A=3:*", &mut diagnostics).is_none()); // no parens
        assert!(parse_variable_definition("A=(x:*)", &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::InvalidVariableDefinition { .. })));
    }

    #[test]
    fn test_parse_definition_rejects_bad_lengths() {
        let mut diagnostics = Vec::new();
        assert!(parse_variable_definition("A=(0:*)", &mut diagnostics).is_none());
        assert!(parse_variable_definition("A=(5-3:*)", &mut diagnostics).is_none());
        assert!(diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::InvalidDefinitionLengths { .. })));
    }

    #[test]
    fn test_parse_definition_rejects_overflowing_length() {
        // a length that does not fit usize is skipped with a diagnostic,
        // never silently dropped
        let mut diagnostics = Vec::new();
        assert!(parse_variable_definition("A=(99999999999999999999:*)", &mut diagnostics).is_none());
        assert!(
            parse_variable_definition("A=(2-99999999999999999999:*)", &mut diagnostics).is_none()
        );
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::InvalidDefinitionLengths { .. })));
    }

    #[test]
    fn test_parse_var_refs() {
        let refs = parse_var_refs("A~BC").unwrap();
        assert_eq!(refs, vec![
            VarRef { name: 'A', reversed: false },
            VarRef { name: 'B', reversed: true },
            VarRef { name: 'C', reversed: false },
        ]);
    }

    #[test]
    fn test_parse_var_refs_rejects_mixed_content() {
        assert!(parse_var_refs("Ab").is_none());
        assert!(parse_var_refs("A*").is_none());
        assert!(parse_var_refs("").is_none());
        assert!(parse_var_refs("cat").is_none());
    }

    #[test]
    fn test_single_clause_cvc() {
        // every 3-letter consonant-vowel-consonant word, bound as {A: word}
        let (results, diagnostics) = run(&["A=(3:#@#)"], &["A"], "cat\ndog\neat\ntop\nabc");
        assert!(diagnostics.is_empty());
        let words: Vec<&str> = results.iter().map(|r| r.primary.as_str()).collect();
        assert_eq!(words, vec!["cat", "dog", "top"]);
        for r in &results {
            assert_eq!(r.bindings.get(&'A'), Some(&r.primary));
            assert!(r.secondary.is_none());
        }
    }

    #[test]
    fn test_single_clause_multi_variable_decomposition() {
        // A=3 letters unconstrained, B=3 letters fixed: 6-letter words split 3+3
        let (results, _) = run(&["A=(3:*)", "B=(3:dog)"], &["AB"], "hotdog\nhotpig\ncat");
        let words: Vec<&str> = results.iter().map(|r| r.primary.as_str()).collect();
        assert_eq!(words, vec!["hotdog"]); // hotpig fails B's subpattern
        assert_eq!(results[0].bindings.get(&'A'), Some(&"hot".to_string()));
        assert_eq!(results[0].bindings.get(&'B'), Some(&"dog".to_string()));
    }

    #[test]
    fn test_single_clause_reversed_reference() {
        // ~A checks the reversed segment; the binding is the reversed value
        let (results, _) = run(&["A=(3:cat)"], &["~A"], "tac\ncat");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].primary, "tac");
        assert_eq!(results[0].bindings.get(&'A'), Some(&"cat".to_string()));
    }

    #[test]
    fn test_single_clause_rejects_range_variable() {
        let (results, diagnostics) = run(&["A=(3-5:*)"], &["A"], "cat\ndogs");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RangeVariableUnsupported { name: 'A', min: 3, max: 5 })));
    }

    #[test]
    fn test_single_clause_rejects_undefined_variable() {
        let (results, diagnostics) = run(&["A=(3:*)"], &["AB"], "catdog");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UndefinedVariable { name: 'B', .. })));
    }

    #[test]
    fn test_single_clause_rejects_non_reference_clause() {
        let (results, diagnostics) = run(&["A=(3:*)"], &["A*"], "cat");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnsupportedEquationClause { .. })));
    }

    #[test]
    fn test_reverse_pair() {
        let (results, diagnostics) =
            run(&["A=(4:*)"], &["A", "~A"], "stop\npots\nevil\nlive\ntest");
        assert!(diagnostics.is_empty());
        assert_eq!(results.len(), 2);
        // each unordered pair exactly once
        let pairs: HashSet<(String, String)> = results
            .iter()
            .map(|r| {
                let w2 = r.secondary.clone().unwrap();
                if r.primary < w2 { (r.primary.clone(), w2) } else { (w2, r.primary.clone()) }
            })
            .collect();
        assert_eq!(pairs, HashSet::from([
            ("evil".to_string(), "live".to_string()),
            ("pots".to_string(), "stop".to_string()),
        ]));
    }

    #[test]
    fn test_reverse_pair_excludes_own_reverse() {
        // "noon" reversed is itself; it must not pair with itself
        let (results, _) = run(&["A=(4:*)"], &["A", "~A"], "noon\nstop\npots");
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r.primary != "noon"));
    }

    #[test]
    fn test_reverse_pair_allows_length_range() {
        let (results, diagnostics) =
            run(&["A=(3-4:*)"], &["A", "~A"], "top\npot\nstop\npots");
        assert!(diagnostics.is_empty());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_sequence_reversal_membership_gate() {
        // abba decomposes as A=ab, B=ba; BA reconstructs "baab"
        let (results, _) = run(&["A=(2:*)", "B=(2:*)"], &["AB", "BA"], "abba\nbaab");
        assert!(results.iter().any(|r| r.primary == "abba"
            && r.secondary.as_deref() == Some("baab")));

        // without baab in the list, the decomposition of abba yields nothing
        let (results, _) = run(&["A=(2:*)", "B=(2:*)"], &["AB", "BA"], "abba");
        assert!(results.iter().all(|r| r.primary != "abba" || r.secondary.as_deref() != Some("baab")));
    }

    #[test]
    fn test_sequence_reversal_with_reversal_flags() {
        // word1 = A + B, word2 = reverse(B) + reverse(A) = reverse(word1)
        let (results, _) =
            run(&["A=(2:*)", "B=(2:*)"], &["AB", "~B~A"], "stop\npots");
        assert!(results.iter().any(|r| r.primary == "pots"
            && r.secondary.as_deref() == Some("stop")));
    }

    #[test]
    fn test_sequence_reversal_requires_exact_lengths() {
        let (results, diagnostics) =
            run(&["A=(2-3:*)", "B=(2:*)"], &["AB", "BA"], "abba\nbaab");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RangeVariableUnsupported { name: 'A', .. })));
    }

    #[test]
    fn test_sequence_reversal_self_pair_reported_once() {
        // "aaaa" decomposes to A=aa, B=aa and reconstructs itself; the
        // binding-map dedup keeps one copy
        let (results, _) = run(&["A=(2:*)", "B=(2:*)"], &["AB", "BA"], "aaaa");
        let self_pairs: Vec<_> = results
            .iter()
            .filter(|r| r.primary == "aaaa" && r.secondary.as_deref() == Some("aaaa"))
            .collect();
        assert_eq!(self_pairs.len(), 1);
    }

    #[test]
    fn test_unrecognized_pair_rejected() {
        let (results, diagnostics) = run(&["A=(2:*)", "B=(2:*)"], &["AB", "AB"], "abab");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnrecognizedClausePair { .. })));
    }

    #[test]
    fn test_more_than_two_clauses_rejected() {
        let (results, diagnostics) = run(&["A=(2:*)"], &["A", "A", "A"], "ab");
        assert!(results.is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::TooManyEquationClauses { count: 3 })));
    }

    #[test]
    fn test_solve_times_out() {
        let index = WordIndex::parse_from_str("cat\ndog");
        let (vars, mut diagnostics) = defs(&["A=(3:*)"]);
        let mut cache = PatternCache::new();
        let clauses = vec!["A".to_string()];
        let expired = Deadline::new(Duration::ZERO);
        let result = solve(&vars, &clauses, &index, &mut cache, &expired, &mut diagnostics);
        assert!(matches!(result, Err(QueryError::Timeout { .. })));
    }
}
