//! # Regular expressions
//!
//! The AST defined here is the immutable, shareable expression tree every
//! rule is compiled down to before it reaches the NFA builder. It is built
//! either by the [surface-syntax parser](parse::parse_pattern) or directly
//! through the factory operations on [`Regex`] — tests and other
//! programmatic callers are free to construct trees without going through
//! surface syntax at all.
//!
//! Unlike `dandy`'s original grapheme-based tree, every leaf here consumes
//! exactly one byte of the fixed 256-value alphabet (see [`crate::charset`]).
//! There is no notion of Unicode normalization or grapheme clusters; `Literal`
//! stores raw bytes, and `CharSet` is a 256-bit mask.

pub mod parse;

use crate::charset::CharSet;
use crate::nfa::builder::{Fragment, NfaBuilder};
use std::rc::Rc;

/// An immutable, cheaply-clonable regular expression tree.
///
/// Cloning a [`Regex`] only bumps a reference count (it wraps an `Rc`), so
/// the same sub-expression can be reused across multiple rules, or within
/// one expression via [`Regex::plus`]'s internal duplication, without
/// re-allocating the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Regex(Rc<RegexTree>);

#[derive(Debug, PartialEq, Eq)]
pub enum RegexTree {
    CharSet(CharSet),
    Literal(Vec<u8>),
    Concat(Regex, Regex),
    Alt(Regex, Regex),
    Star(Regex),
    Plus(Regex),
    Optional(Regex),
}

impl Regex {
    /// A single byte matching `set`.
    pub fn char_set(set: CharSet) -> Regex {
        Regex(Rc::new(RegexTree::CharSet(set)))
    }

    /// An exact sequence of bytes.
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Regex {
        Regex(Rc::new(RegexTree::Literal(bytes.into())))
    }

    /// Any single byte — shorthand for `Regex::char_set(CharSet::any())`.
    pub fn wildcard() -> Regex {
        Regex::char_set(CharSet::any())
    }

    /// `self` followed by `other`.
    pub fn concat(self, other: Regex) -> Regex {
        Regex(Rc::new(RegexTree::Concat(self, other)))
    }

    /// `self` or `other`.
    pub fn alt(self, other: Regex) -> Regex {
        Regex(Rc::new(RegexTree::Alt(self, other)))
    }

    /// Zero or more repetitions of `self`.
    pub fn star(self) -> Regex {
        Regex(Rc::new(RegexTree::Star(self)))
    }

    /// One or more repetitions of `self`.
    pub fn plus(self) -> Regex {
        Regex(Rc::new(RegexTree::Plus(self)))
    }

    /// Zero or one repetitions of `self`.
    pub fn optional(self) -> Regex {
        Regex(Rc::new(RegexTree::Optional(self)))
    }

    pub fn tree(&self) -> &RegexTree {
        &self.0
    }

    /// Emits this expression's Thompson fragment into `builder`, returning
    /// the fragment's entry and exit node ids. See the module-level
    /// documentation of [`crate::nfa`] for the per-variant construction this
    /// implements.
    pub(crate) fn build_fragment(&self, builder: &mut NfaBuilder) -> Fragment {
        match self.0.as_ref() {
            RegexTree::CharSet(set) => {
                let s = builder.fresh_node();
                let e = builder.fresh_node();
                for b in set.iter_bytes() {
                    builder.transition(s, e, b);
                }
                Fragment::new(s, e)
            }
            RegexTree::Literal(bytes) => {
                let entry = builder.fresh_node();
                let mut prev = entry;
                for &b in bytes {
                    let next = builder.fresh_node();
                    builder.transition(prev, next, b);
                    prev = next;
                }
                Fragment::new(entry, prev)
            }
            RegexTree::Concat(left, right) => {
                let lf = left.build_fragment(builder);
                let rf = right.build_fragment(builder);
                builder.epsilon(lf.exit, rf.entry);
                Fragment::new(lf.entry, rf.exit)
            }
            RegexTree::Alt(left, right) => {
                let s = builder.fresh_node();
                let e = builder.fresh_node();
                let lf = left.build_fragment(builder);
                let rf = right.build_fragment(builder);
                builder.epsilon(s, lf.entry);
                builder.epsilon(s, rf.entry);
                builder.epsilon(lf.exit, e);
                builder.epsilon(rf.exit, e);
                Fragment::new(s, e)
            }
            RegexTree::Star(inner) => build_star_fragment(inner, builder),
            RegexTree::Plus(inner) => {
                // Plus(I) desugars to Concat(I, Star(I)): I is emitted twice,
                // once for the mandatory first occurrence and once inside
                // the star fragment for the repeats. The AST itself keeps
                // the Plus node; only fragment emission flattens it.
                let first = inner.build_fragment(builder);
                let star = build_star_fragment(inner, builder);
                builder.epsilon(first.exit, star.entry);
                Fragment::new(first.entry, star.exit)
            }
            RegexTree::Optional(inner) => {
                let s = builder.fresh_node();
                let e = builder.fresh_node();
                let innerf = inner.build_fragment(builder);
                builder.epsilon(s, e);
                builder.epsilon(s, innerf.entry);
                builder.epsilon(innerf.exit, e);
                Fragment::new(s, e)
            }
        }
    }
}

fn build_star_fragment(inner: &Regex, builder: &mut NfaBuilder) -> Fragment {
    let s = builder.fresh_node();
    let e = builder.fresh_node();
    let innerf = inner.build_fragment(builder);
    builder.epsilon(innerf.entry, innerf.exit);
    builder.epsilon(innerf.exit, innerf.entry);
    builder.epsilon(s, innerf.entry);
    builder.epsilon(innerf.exit, e);
    Fragment::new(s, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharSet;
    use crate::nfa::Nfa;

    fn single_rule_nfa(regex: Regex) -> Nfa {
        let mut builder = NfaBuilder::new();
        let s0 = builder.fresh_node();
        builder.add_start(s0);
        let fragment = regex.build_fragment(&mut builder);
        builder.epsilon(s0, fragment.entry);
        builder.add_end(fragment.exit, 0);
        builder.build()
    }

    #[test]
    fn literal_fragment_is_not_nullable() {
        let nfa = single_rule_nfa(Regex::literal(*b"ab"));
        let start = nfa.epsilon_closure(nfa.starts().iter().copied());
        assert!(!nfa.ends().iter().any(|&(n, _)| start.contains(&n)));
    }

    #[test]
    fn star_fragment_accepts_empty_from_start() {
        let nfa = single_rule_nfa(Regex::char_set(CharSet::singleton(b'a')).star());
        let start = nfa.epsilon_closure(nfa.starts().iter().copied());
        assert!(nfa.ends().iter().any(|&(n, _)| start.contains(&n)));
    }

    #[test]
    fn literal_equality_is_structural() {
        assert_eq!(Regex::literal(*b"x"), Regex::literal(*b"x"));
        assert_ne!(Regex::literal(*b"x"), Regex::literal(*b"y"));
    }
}
