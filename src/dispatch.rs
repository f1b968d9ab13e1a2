//! Query classification and execution.
//!
//! A raw query is split on `;` into clauses. Clauses shaped like variable
//! definitions (`X=(...)`) are parsed up front; the remaining search clauses
//! decide the mode:
//!
//! - any variable definitions plus search clauses: **equation** solve
//! - one clause starting with `/`: **anagram** search
//! - one clause: **simple** pattern match
//! - several plain clauses: **intersection** (words matching every clause)
//! - definitions only, no search clause: nothing to run
//!
//! All modes share one deadline, one pattern cache, and one diagnostic list
//! per query, and results are capped at `max_results` after matching.

use crate::anagram;
use crate::deadline::Deadline;
use crate::equation::{self, VariableDefinition};
use crate::errors::{Diagnostic, QueryError};
use crate::matcher;
use crate::pattern::PatternCache;
use crate::word_index::WordIndex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

/// How a query was classified, or how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Simple,
    Anagram,
    Equation,
    Intersection,
    /// Only variable definitions were given; there was nothing to search.
    DefinitionOnly,
    Timeout,
    Error,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ResultKind::Simple => "simple",
            ResultKind::Anagram => "anagram",
            ResultKind::Equation => "equation",
            ResultKind::Intersection => "intersection",
            ResultKind::DefinitionOnly => "definition_only",
            ResultKind::Timeout => "timeout",
            ResultKind::Error => "error",
        };
        write!(f, "{tag}")
    }
}

/// One match. Plain searches fill only `primary`; equation searches also
/// carry the variable bindings, and pair relations fill `secondary`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub primary: String,
    pub secondary: Option<String>,
    /// Variable name to bound value, ordered by name.
    pub bindings: BTreeMap<char, String>,
}

impl MatchResult {
    pub(crate) fn word(word: String) -> Self {
        MatchResult { primary: word, secondary: None, bindings: BTreeMap::new() }
    }
}

/// Everything a query run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub kind: ResultKind,
    /// `None` when the query timed out or failed; `Some` (possibly empty)
    /// otherwise. A timeout discards partial matches rather than returning
    /// an incomplete set that looks complete.
    pub results: Option<Vec<MatchResult>>,
    pub diagnostics: Vec<Diagnostic>,
    pub elapsed: Duration,
}

/// True for clauses shaped like a variable definition attempt, well-formed
/// or not. A malformed attempt is still routed to definition parsing so it
/// gets a definition diagnostic instead of being searched as a pattern.
fn looks_like_definition(clause: &str) -> bool {
    clause.contains('=') && clause.starts_with(|c| ('A'..='R').contains(&c))
}

/// Execute one query against the index.
///
/// Never returns an error: timeouts and internal faults are folded into the
/// output's `kind` so the caller always has one uniform thing to render.
pub fn execute_query(
    raw_query: &str,
    index: &WordIndex,
    max_results: usize,
    timeout: Duration,
) -> QueryOutput {
    let deadline = Deadline::new(timeout);
    let mut diagnostics = Vec::new();

    if index.is_empty() {
        let diagnostic = Diagnostic::NoWordlist;
        log::warn!("{}", diagnostic.display_detailed());
        diagnostics.push(diagnostic);
        return QueryOutput {
            kind: ResultKind::Error,
            results: None,
            diagnostics,
            elapsed: deadline.elapsed(),
        };
    }

    let query = raw_query.trim();
    log::info!("executing query: \"{query}\"");

    // a panic anywhere in matching must not escape the engine; it becomes an
    // Internal error and then an `error`-tagged output like any other fault
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_query(query, index, &deadline, &mut diagnostics)
    }))
    .unwrap_or_else(|payload| Err(QueryError::Internal { context: panic_context(payload.as_ref()) }));

    let (kind, results) = fold_outcome(outcome, max_results, &mut diagnostics);
    if let Some(results) = &results {
        log::info!(
            "query \"{query}\" finished: {kind}, {} result(s) in {:?}",
            results.len(),
            deadline.elapsed()
        );
    }

    QueryOutput { kind, results, diagnostics, elapsed: deadline.elapsed() }
}

/// Best-effort description of a caught panic payload.
fn panic_context(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected panic".to_string())
}

/// Fold a matcher outcome into the output's `(kind, results)` shape: success
/// is truncated, a timeout discards results, an internal fault additionally
/// records a diagnostic.
fn fold_outcome(
    outcome: Result<(ResultKind, Vec<MatchResult>), QueryError>,
    max_results: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> (ResultKind, Option<Vec<MatchResult>>) {
    match outcome {
        Ok((kind, mut results)) => {
            results.truncate(max_results);
            (kind, Some(results))
        }
        Err(e @ QueryError::Timeout { .. }) => {
            log::warn!("{}", e.display_detailed());
            (ResultKind::Timeout, None)
        }
        Err(e) => {
            log::error!("{}", e.display_detailed());
            if let QueryError::Internal { context } = e {
                diagnostics.push(Diagnostic::InternalFault { context });
            }
            (ResultKind::Error, None)
        }
    }
}

/// Classify and run; the caller folds the error into the output.
fn run_query(
    query: &str,
    index: &WordIndex,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(ResultKind, Vec<MatchResult>), QueryError> {
    let mut cache = PatternCache::new();

    let mut vars: HashMap<char, VariableDefinition> = HashMap::new();
    let mut search_clauses: Vec<String> = Vec::new();

    for clause in query.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if looks_like_definition(clause) {
            // a later definition of the same name overwrites the earlier one
            if let Some(def) = equation::parse_variable_definition(clause, diagnostics) {
                vars.insert(def.name, def);
            }
        } else {
            search_clauses.push(clause.to_string());
        }
    }

    if !vars.is_empty() && !search_clauses.is_empty() {
        let results =
            equation::solve(&vars, &search_clauses, index, &mut cache, deadline, diagnostics)?;
        return Ok((ResultKind::Equation, results));
    }

    match search_clauses.as_slice() {
        [] => Ok((ResultKind::DefinitionOnly, Vec::new())),
        [clause] if clause.starts_with('/') => {
            let words = anagram::find_matches(clause, index, deadline)?;
            Ok((ResultKind::Anagram, words.into_iter().map(MatchResult::word).collect()))
        }
        [clause] => {
            let words = matcher::find_matches(clause, index, &mut cache, deadline, diagnostics)?;
            Ok((ResultKind::Simple, words.into_iter().map(MatchResult::word).collect()))
        }
        clauses => {
            let words = intersect(clauses, index, &mut cache, deadline, diagnostics)?;
            Ok((ResultKind::Intersection, words.into_iter().map(MatchResult::word).collect()))
        }
    }
}

/// Words satisfying every clause. Starts from the first clause's matches and
/// progressively filters; an empty intermediate set short-circuits.
fn intersect(
    clauses: &[String],
    index: &WordIndex,
    cache: &mut PatternCache,
    deadline: &Deadline,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<String>, QueryError> {
    let mut survivors: Option<Vec<String>> = None;

    for clause in clauses {
        let matched = if clause.starts_with('/') {
            anagram::find_matches(clause, index, deadline)?
        } else {
            matcher::find_matches(clause, index, cache, deadline, diagnostics)?
        };

        survivors = Some(match survivors {
            None => matched,
            Some(prev) => {
                let keep: std::collections::HashSet<&str> =
                    matched.iter().map(String::as_str).collect();
                prev.into_iter().filter(|w| keep.contains(w.as_str())).collect()
            }
        });

        if survivors.as_ref().is_some_and(Vec::is_empty) {
            break;
        }
    }

    let mut words = survivors.unwrap_or_default();
    words.sort();
    Ok(words)
}
