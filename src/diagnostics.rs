//! Non-fatal findings produced while compiling a rule set.
//!
//! Unlike [`crate::error::RegexSyntaxError`], nothing here stops compilation
//! — a [`Diagnostic`] is returned data for the caller to print, log through
//! whatever framework their own application uses, or ignore outright. This
//! crate has no I/O of its own (see the module docs on [`crate::compile`]),
//! so diagnostics are collected into a `Vec` rather than written anywhere.

use std::fmt;

/// A finding surfaced during [`crate::compile::compile`] that does not
/// prevent a DFA from being produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two or more rules can accept at the same DFA state. `winning_rule`
    /// is the earliest-declared rule (lowest index), which is the one the
    /// DFA actually reports; `losing_rule` names a rule shadowed at that
    /// state. One diagnostic is emitted per losing rule per conflicting
    /// state.
    RuleConflict { winning_rule: usize, losing_rule: usize },
    /// Reports the effect of equivalence-class compression: the DFA's
    /// transition table went from `states * 256` entries to
    /// `states * class_count`.
    CompressionStats { states: usize, class_count: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RuleConflict { winning_rule, losing_rule } => write!(
                f,
                "rule {losing_rule} is shadowed by rule {winning_rule} at a shared accepting state"
            ),
            Diagnostic::CompressionStats { states, class_count } => write!(
                f,
                "compressed {states} states into {class_count} byte equivalence classes"
            ),
        }
    }
}
