//! Fatal error types.
//!
//! Regex syntax errors are the only fatal error kind this crate produces —
//! everything else a rule set can go wrong in (an accept-state conflict
//! between two rules) is non-fatal and reported through
//! [`crate::diagnostics::Diagnostic`] instead. See that module for why.

use thiserror::Error;

/// A regex pattern failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexSyntaxError {
    #[error("unexpected end of pattern")]
    UnexpectedEnd,

    #[error("unexpected token at offset {offset}")]
    UnexpectedToken { offset: usize },

    #[error("unterminated group starting before offset {offset}")]
    UnterminatedGroup { offset: usize },

    #[error("unterminated character class starting before offset {offset}")]
    UnterminatedClass { offset: usize },

    #[error("unmatched closing parenthesis at offset {offset}")]
    UnmatchedCloseParen { offset: usize },

    #[error("invalid \\x escape")]
    InvalidHexEscape,

    #[error("invalid octal escape")]
    InvalidOctalEscape,

    #[error("non-ascii character in pattern at offset {offset}")]
    NonAsciiCharacter { offset: usize },

    #[error("non-ascii character '{character}' after backslash escape")]
    NonAsciiEscape { character: char },
}

impl RegexSyntaxError {
    /// Shifts any embedded byte offset forward by `base`, used when an
    /// escape body is parsed from a substring and its error needs to be
    /// reported relative to the whole pattern.
    pub(crate) fn with_offset(self, base: usize) -> RegexSyntaxError {
        match self {
            RegexSyntaxError::UnexpectedToken { offset } => {
                RegexSyntaxError::UnexpectedToken { offset: offset + base }
            }
            RegexSyntaxError::UnterminatedGroup { offset } => {
                RegexSyntaxError::UnterminatedGroup { offset: offset + base }
            }
            RegexSyntaxError::UnterminatedClass { offset } => {
                RegexSyntaxError::UnterminatedClass { offset: offset + base }
            }
            RegexSyntaxError::UnmatchedCloseParen { offset } => {
                RegexSyntaxError::UnmatchedCloseParen { offset: offset + base }
            }
            RegexSyntaxError::NonAsciiCharacter { offset } => {
                RegexSyntaxError::NonAsciiCharacter { offset: offset + base }
            }
            other => other,
        }
    }
}

/// A [`RegexSyntaxError`] attributed to the rule that produced it.
///
/// Rule ingestion (see [`crate::compile`]) parses every rule's pattern up
/// front; wrapping the underlying syntax error with the offending rule's
/// index lets a caller report "rule 3: unterminated group" instead of a
/// bare parser error with no context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule {rule_index}: {source}")]
pub struct RuleError {
    pub rule_index: usize,
    #[source]
    pub source: RegexSyntaxError,
}

impl RuleError {
    pub fn new(rule_index: usize, source: RegexSyntaxError) -> RuleError {
        RuleError { rule_index, source }
    }
}
