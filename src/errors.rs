//! Error and diagnostic types for query execution.
//!
//! Two layers:
//!
//! - [`Diagnostic`]: non-fatal findings (a skipped variable definition, a
//!   pattern that could not be compiled, an unsupported equation shape).
//!   These are collected into a list and returned alongside the results
//!   rather than being printed from inside the matching logic.
//! - [`QueryError`]: hard outcomes that abort a query: the deadline expired,
//!   or an internal fault was caught at the dispatcher boundary.
//!
//! # Diagnostic Codes
//!
//! Each diagnostic variant has a unique code (D001-D011) for documentation lookup:
//!
//! - D001: `InvalidVariableDefinition` (Malformed variable definition syntax)
//! - D002: `InvalidDefinitionLengths` (Non-positive or inverted length bounds)
//! - D003: `InvalidLengthPrefix` (Malformed `N:` / `N-M:` clause prefix)
//! - D004: `PatternRegex` (Pattern did not compile to a usable regex)
//! - D005: `UndefinedVariable` (Clause references a variable never defined)
//! - D006: `RangeVariableUnsupported` (Range-length variable in equation decomposition)
//! - D007: `UnsupportedEquationClause` (Clause is not a pure variable-reference sequence)
//! - D008: `UnrecognizedClausePair` (Two-clause equation matches no known relation)
//! - D009: `TooManyEquationClauses` (More than two search clauses with variables)
//! - D010: `NoWordlist` (Query attempted against an empty index)
//! - D011: `InternalFault` (Unexpected fault captured at the dispatcher)

use std::time::Duration;

/// A non-fatal finding produced while executing a query.
///
/// Diagnostics never abort the query on their own; they explain why a clause
/// was skipped or why a result set is empty.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("invalid variable definition: \"{definition}\"")]
    InvalidVariableDefinition { definition: String },

    #[error("invalid lengths in variable definition: \"{definition}\"")]
    InvalidDefinitionLengths { definition: String },

    #[error("invalid length prefix in clause: \"{clause}\"")]
    InvalidLengthPrefix { clause: String },

    #[error("pattern \"{pattern}\" produced an invalid regex: {reason}")]
    PatternRegex { pattern: String, reason: String },

    #[error("variable '{name}' used in \"{clause}\" but not defined")]
    UndefinedVariable { name: char, clause: String },

    #[error("variable '{name}' has range {min}-{max}; equation decomposition requires a fixed length")]
    RangeVariableUnsupported { name: char, min: usize, max: usize },

    #[error("clause \"{clause}\" is not a pure variable-reference sequence")]
    UnsupportedEquationClause { clause: String },

    #[error("clause pair \"{first};{second}\" matches no supported equation relation")]
    UnrecognizedClausePair { first: String, second: String },

    #[error("equation queries support at most 2 search clauses (got {count})")]
    TooManyEquationClauses { count: usize },

    #[error("no wordlist loaded")]
    NoWordlist,

    #[error("internal fault: {context}")]
    InternalFault { context: String },
}

impl Diagnostic {
    /// Returns the diagnostic code for this variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::InvalidVariableDefinition { .. } => "D001",
            Diagnostic::InvalidDefinitionLengths { .. } => "D002",
            Diagnostic::InvalidLengthPrefix { .. } => "D003",
            Diagnostic::PatternRegex { .. } => "D004",
            Diagnostic::UndefinedVariable { .. } => "D005",
            Diagnostic::RangeVariableUnsupported { .. } => "D006",
            Diagnostic::UnsupportedEquationClause { .. } => "D007",
            Diagnostic::UnrecognizedClausePair { .. } => "D008",
            Diagnostic::TooManyEquationClauses { .. } => "D009",
            Diagnostic::NoWordlist => "D010",
            Diagnostic::InternalFault { .. } => "D011",
        }
    }

    /// Returns a helpful suggestion or example for this diagnostic
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Diagnostic::InvalidVariableDefinition { .. } => {
                Some("Expected format: X=(len:pattern) or X=(min-max:pattern), e.g. A=(3:#@#)")
            }
            Diagnostic::InvalidDefinitionLengths { .. } => {
                Some("Lengths must be positive and min must not exceed max")
            }
            Diagnostic::InvalidLengthPrefix { .. } => {
                Some("Expected N: (exact) or N-M: (range) with 0 < N <= M, e.g. '3:c.t' or '3-5:c*'")
            }
            Diagnostic::UndefinedVariable { .. } => {
                Some("Add a definition clause like A=(3:*) before referencing the variable")
            }
            Diagnostic::RangeVariableUnsupported { .. } => {
                Some("Give the variable an exact length, e.g. A=(4:*) instead of A=(3-5:*)")
            }
            Diagnostic::UnsupportedEquationClause { .. } => {
                Some("Equation clauses must consist only of variable references like AB or ~A")
            }
            Diagnostic::UnrecognizedClausePair { .. } => {
                Some("Supported pairs: a reversal pair like 'A;~A', or a sequence reversal like 'AB;BA'")
            }
            Diagnostic::NoWordlist => Some("Load a wordlist before executing queries"),
            _ => None,
        }
    }

    /// Formats the diagnostic with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Hard query outcomes; these abort the run and discard partial work.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The query-wide deadline was exceeded at a checkpoint.
    #[error("query exceeded its deadline after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// An unexpected fault captured at the dispatcher boundary.
    #[error("internal fault: {context}")]
    Internal { context: String },
}

impl QueryError {
    /// Returns the error code for this variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Timeout { .. } => "Q001",
            QueryError::Internal { .. } => "Q002",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            QueryError::Timeout { .. } => {
                Some("Narrow the query (add a length prefix or more literals) or raise the timeout")
            }
            QueryError::Internal { .. } => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper to format messages with code and optional help text
pub(crate) fn format_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
