//! # lexcore
//!
//! `lexcore` compiles a list of tagged regular expressions — pattern plus
//! action, the way a lexer generator's rule file pairs them — down to a
//! minimized, byte-indexed DFA. It covers exactly the compilation pipeline:
//! parsing the regex syntax, building a Thompson-construction NFA, subset
//! construction into a DFA with per-rule accept attribution, Hopcroft
//! minimization and equivalence-class table compression. It does not read
//! rule files, does not parse command-line arguments, and does not emit
//! scanner source code — those are jobs for a tool built on top of this
//! crate, not this crate itself.
//!
//! ## Usage
//!
//! ```rust
//! use lexcore::compile::{compile, CompileOptions, Rule};
//!
//! let rules = vec![
//!     Rule::new(r#""if""#, "KW_IF"),
//!     Rule::new("/[a-zA-Z_][a-zA-Z0-9_]*/", "IDENT"),
//! ];
//! let compiled = compile(&rules, CompileOptions::default()).unwrap();
//! assert_eq!(compiled.dfa.simulate(b"if"), Some((0, 2)));
//! assert_eq!(compiled.dfa.simulate(b"iffy"), Some((1, 4)));
//! ```
//!
//! ## Alphabet
//!
//! Every transition consumes exactly one byte; there is no multi-byte or
//! grapheme handling anywhere in the pipeline. [`charset::CharSet`] is the
//! 256-bit mask every single-byte-matching AST node is built from.
//!
//! ## Pipeline
//!
//! * [`regex`] — the AST ([`regex::Regex`]) and its surface-syntax parser
//!   ([`regex::parse`]).
//! * [`nfa`] — Thompson construction ([`nfa::builder`]) and subset
//!   construction into a DFA ([`nfa::subset`]).
//! * [`dfa`] — the DFA itself, Hopcroft minimization ([`dfa::minimize`]) and
//!   equivalence-class compression ([`dfa::compress`]).
//! * [`diagnostics`] — non-fatal findings (rule conflicts, compression
//!   stats) collected rather than printed; this crate does no I/O.
//! * [`error`] — the one fatal error kind, a regex syntax error attributed
//!   to its offending rule.
//! * [`compile`] — wires the stages above into one entry point.

pub mod charset;
pub mod compile;
pub mod dfa;
pub mod diagnostics;
pub mod error;
pub mod nfa;
pub mod regex;
