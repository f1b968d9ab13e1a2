//! Pattern compilation: the search mini-language → an anchored regex.
//!
//! Mini-language, one token at a time:
//! - `.`: exactly one arbitrary letter
//! - `*`: zero or more arbitrary letters
//! - `#`: exactly one consonant
//! - `@`: exactly one vowel
//! - `[...]`: character class, copied into the regex verbatim; an unclosed
//!   `[` is treated as a literal character
//! - `\x`: literal `x`, whatever `x` is; a trailing lone `\` is a literal
//!   backslash
//! - anything else: a literal character
//!
//! The compiled regex is anchored at both ends, so a pattern always matches
//! whole words. Compilation failures (e.g. a bad verbatim class like `[z-a]`)
//! surface as a [`Diagnostic`] and the pattern then rejects every word.

use crate::errors::Diagnostic;
use crate::wf_char::{CONSONANTS, VOWELS};
use fancy_regex::Regex;
use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::{anychar, char};
use nom::combinator::{map, value};
use nom::sequence::{delimited, preceded};
use nom::IResult;
use std::collections::HashMap;
use std::rc::Rc;

/// One token of the pattern mini-language.
#[derive(Debug, Clone, PartialEq)]
enum PatternPart {
    Dot,
    Star,
    Vowel,
    Consonant,
    Class(String), // body between '[' and ']', passed through verbatim
    Literal(char),
}

fn class(input: &str) -> IResult<&str, PatternPart> {
    map(
        delimited(char('['), take_while(|c| c != ']'), char(']')),
        |body: &str| PatternPart::Class(body.to_string()),
    )(input)
}

fn escaped(input: &str) -> IResult<&str, PatternPart> {
    map(preceded(char('\\'), anychar), PatternPart::Literal)(input)
}

fn literal(input: &str) -> IResult<&str, PatternPart> {
    map(anychar, PatternPart::Literal)(input)
}

/// `class` and `escaped` must come before `literal`, which accepts anything;
/// when they fail partway (unclosed `[`, trailing `\`) the offending character
/// falls through and is taken literally.
fn pattern_part(input: &str) -> IResult<&str, PatternPart> {
    alt((
        class,
        escaped,
        value(PatternPart::Dot, char('.')),
        value(PatternPart::Star, char('*')),
        value(PatternPart::Vowel, char('@')),
        value(PatternPart::Consonant, char('#')),
        literal,
    ))(input)
}

/// Translate a mini-language pattern into an anchored regex string.
///
/// Tokenization cannot fail (every character is at worst a literal), so this
/// is infallible; only the later regex *compilation* can reject the result.
pub fn pattern_to_regex(pattern: &str) -> String {
    let mut rest = pattern;
    let mut regex_str = String::with_capacity(pattern.len() + 2);
    regex_str.push('^');

    while !rest.is_empty() {
        // `literal` consumes any char, so pattern_part never fails on non-empty input
        let Ok((next, part)) = pattern_part(rest) else { break };
        match part {
            PatternPart::Dot => regex_str.push('.'),
            PatternPart::Star => regex_str.push_str(".*"),
            PatternPart::Vowel => {
                regex_str.push('[');
                regex_str.push_str(VOWELS);
                regex_str.push(']');
            }
            PatternPart::Consonant => {
                regex_str.push('[');
                regex_str.push_str(CONSONANTS);
                regex_str.push(']');
            }
            PatternPart::Class(body) => {
                regex_str.push('[');
                regex_str.push_str(&body);
                regex_str.push(']');
            }
            PatternPart::Literal(c) => {
                regex_str.push_str(&fancy_regex::escape(&c.to_string()));
            }
        }
        rest = next;
    }

    regex_str.push('$');
    regex_str
}

/// Per-query compile cache, keyed by the exact pattern string.
///
/// `None` marks a pattern that failed to compile; the diagnostic for it was
/// emitted on first sight and every later lookup rejects silently. The cache
/// is owned by one query execution and dropped with it, never promoted
/// to a process-wide cache, which would need an invalidation rule tied to
/// index replacement.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Option<Rc<Regex>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or compile the anchored regex for `pattern`.
    ///
    /// Returns `None` (and records a [`Diagnostic::PatternRegex`] the first
    /// time) when the pattern does not compile; callers treat `None` as
    /// "matches nothing".
    pub(crate) fn get_or_compile(
        &mut self,
        pattern: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Rc<Regex>> {
        if let Some(entry) = self.compiled.get(pattern) {
            return entry.clone();
        }

        let regex_str = pattern_to_regex(pattern);
        let entry = match Regex::new(&regex_str) {
            Ok(re) => Some(Rc::new(re)),
            Err(e) => {
                let diagnostic = Diagnostic::PatternRegex {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                };
                log::warn!("{}", diagnostic.display_detailed());
                diagnostics.push(diagnostic);
                None
            }
        };

        self.compiled.insert(pattern.to_string(), entry.clone());
        entry
    }
}

/// Run an already-compiled pattern against a word.
///
/// `fancy_regex` matching can itself error (backtrack limits); per the error
/// taxonomy that means "no match", never a fault.
pub(crate) fn regex_matches(re: &Regex, word: &str) -> bool {
    re.is_match(word).unwrap_or(false)
}
