//! Top-level entry point: turns a list of tagged rules into a compiled
//! scanner's tables.
//!
//! This is deliberately the only place the whole pipeline — parse, build
//! NFA, subset-construct, minimize, optionally compress — is wired
//! together end to end; every earlier stage is usable on its own (directly
//! constructing a [`Regex`](crate::regex::Regex) tree and feeding it to
//! [`NfaBuilder`](crate::nfa::builder::NfaBuilder) skips the parser
//! entirely, for example), but most callers just want [`compile`].

use crate::dfa::{CompressedDfa, Dfa};
use crate::diagnostics::Diagnostic;
use crate::error::RuleError;
use crate::nfa::builder::NfaBuilder;
use crate::nfa::subset;
use crate::nfa::Nfa;
use crate::regex::parse::parse_pattern;

/// One tagged rule: a pattern in its surface syntax (`"literal"` or
/// `/regex/`, see [`parse_pattern`]) plus an opaque action label.
///
/// The action is carried through untouched — this crate has no opinion on
/// what a "token" or "action" means downstream. Interpreting action
/// payloads as emitted code is the job of a code generator built on top of
/// this crate, not this crate itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub action: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, action: impl Into<String>) -> Rule {
        Rule { pattern: pattern.into(), action: action.into() }
    }
}

/// Knobs controlling how far [`compile`] takes the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Run Hopcroft minimization after subset construction. Default `true`.
    pub minimize: bool,
    /// Also produce the equivalence-class-compressed table. Default `true`.
    pub compress: bool,
    /// Collect a [`Diagnostic::CompressionStats`] entry when `compress` runs.
    /// This is the "verbose flag" §6 describes gating compression
    /// statistics; it has no effect when `compress` is `false`. Default
    /// `false` — callers who don't want the extra diagnostic entry on every
    /// compile don't pay for it.
    pub verbose: bool,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions { minimize: true, compress: true, verbose: false }
    }
}

/// The tables produced by compiling a rule set, plus whatever
/// [`Diagnostic`]s came up along the way.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub dfa: Dfa,
    /// The Thompson-construction NFA subset construction was run on,
    /// retained so a caller (e.g. a DOT dumper) can still inspect it even
    /// though the pipeline itself has no further use for it.
    pub nfa: Nfa,
    /// Present when `options.compress` was set.
    pub compressed: Option<CompressedDfa>,
    /// `actions[rule_index]` is that rule's action label, in declaration
    /// order — the same indexing [`Dfa::rule_at`] returns.
    pub actions: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles `rules` into a minimized (and, by default, compressed) DFA.
///
/// Returns `Err` only for a fatal regex syntax error, attributed to the
/// offending rule's index. Accept-state conflicts between rules are never
/// fatal — they show up as [`Diagnostic::RuleConflict`] entries in the
/// result instead, following "earliest declared rule wins".
pub fn compile(rules: &[Rule], options: CompileOptions) -> Result<CompiledRules, RuleError> {
    let mut builder = NfaBuilder::new();
    for (rule_index, rule) in rules.iter().enumerate() {
        let regex = parse_pattern(&rule.pattern)
            .map_err(|source| RuleError::new(rule_index, source))?;
        let entry = builder.fresh_node();
        builder.add_start(entry);
        let fragment = regex.build_fragment(&mut builder);
        builder.epsilon(entry, fragment.entry);
        builder.add_end(fragment.exit, rule_index);
    }
    let nfa = builder.build();
    let (mut dfa, mut diagnostics) = subset::build_dfa(&nfa);

    if options.minimize {
        dfa.minimize();
    }

    let compressed = if options.compress {
        let compressed = dfa.compress();
        if options.verbose {
            diagnostics.push(Diagnostic::CompressionStats {
                states: compressed.state_count(),
                class_count: compressed.class_count(),
            });
        }
        Some(compressed)
    } else {
        None
    };

    Ok(CompiledRules {
        dfa,
        nfa,
        compressed,
        actions: rules.iter().map(|r| r.action.clone()).collect(),
        diagnostics,
    })
}
