//! Subset (powerset) construction: turns an [`Nfa`] into a [`Dfa`].
//!
//! Every DFA state is a set of NFA nodes reachable from some starting point
//! via the bytes consumed so far, closed under ε-transitions. States are
//! explored in creation order from a single worklist, and each byte's
//! transition is computed by moving every node in the set across that byte
//! and taking the ε-closure of the result — dead (empty) transitions are
//! represented as `-1` in the DFA's table rather than gaining an explicit
//! trap state.

use super::Nfa;
use crate::charset::BYTE_MAX;
use crate::dfa::Dfa;
use crate::diagnostics::Diagnostic;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Runs subset construction on `nfa`, returning the resulting DFA together
/// with any rule-conflict diagnostics discovered along the way.
///
/// A conflict arises when a single DFA state's underlying NFA-node-set
/// contains end nodes for more than one rule: the input could be accepted
/// by either. The earliest-declared rule (smallest rule index) wins, and
/// every other rule tied at that state is reported as a losing diagnostic —
/// the caller decides whether that's acceptable (e.g. intentional fallback
/// rules) or a mistake worth surfacing.
pub fn build_dfa(nfa: &Nfa) -> (Dfa, Vec<Diagnostic>) {
    let mut index: BTreeMap<BTreeSet<usize>, usize> = BTreeMap::new();
    let mut sets: Vec<BTreeSet<usize>> = Vec::new();
    let mut worklist: Vec<usize> = Vec::new();

    let start_closure = nfa.epsilon_closure(nfa.starts().iter().copied());
    index.insert(start_closure.clone(), 0);
    sets.push(start_closure);
    worklist.push(0);

    let mut transition: Vec<i64> = Vec::new();
    let mut diagnostics = Vec::new();

    while let Some(state_id) = worklist.pop() {
        if transition.len() < (state_id + 1) * BYTE_MAX {
            transition.resize((state_id + 1) * BYTE_MAX, -1);
        }
        let current = sets[state_id].clone();
        for byte in 0..BYTE_MAX {
            let b = byte as u8;
            let moved: BTreeSet<usize> = current
                .iter()
                .flat_map(|&n| {
                    nfa.transitions_from(n)
                        .iter()
                        .filter(move |&&(edge_byte, _)| edge_byte == b)
                        .map(|&(_, target)| target)
                })
                .collect();
            if moved.is_empty() {
                continue;
            }
            let closure = nfa.epsilon_closure(moved);
            let target_id = match index.get(&closure) {
                Some(&id) => id,
                None => {
                    let id = sets.len();
                    index.insert(closure.clone(), id);
                    sets.push(closure);
                    worklist.push(id);
                    id
                }
            };
            if transition.len() < (state_id + 1) * BYTE_MAX {
                transition.resize((state_id + 1) * BYTE_MAX, -1);
            }
            transition[state_id * BYTE_MAX + byte] = target_id as i64;
        }
    }

    let state_count = sets.len();
    transition.resize(state_count * BYTE_MAX, -1);

    let mut accept = vec![false; state_count];
    let mut rule_of = vec![-1i64; state_count];
    for (state_id, node_set) in sets.iter().enumerate() {
        let mut rules: BTreeSet<usize> = BTreeSet::new();
        for &node in node_set {
            rules.extend(nfa.rules_accepted_at(node));
        }
        if let Some(&winner) = rules.iter().min() {
            accept[state_id] = true;
            rule_of[state_id] = winner as i64;
            for &losing_rule in rules.iter().filter(|&&r| r != winner) {
                diagnostics.push(Diagnostic::RuleConflict {
                    winning_rule: winner,
                    losing_rule,
                });
            }
        }
    }

    let dfa = Dfa::from_parts(state_count, transition, accept, rule_of);
    (dfa, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharSet;
    use crate::regex::Regex;

    fn nfa_for(rules: Vec<Regex>) -> Nfa {
        use crate::nfa::builder::NfaBuilder;
        let mut builder = NfaBuilder::new();
        for (rule_index, regex) in rules.into_iter().enumerate() {
            let s0 = builder.fresh_node();
            builder.add_start(s0);
            let fragment = regex.build_fragment(&mut builder);
            builder.epsilon(s0, fragment.entry);
            builder.add_end(fragment.exit, rule_index);
        }
        builder.build()
    }

    #[test]
    fn single_literal_rule_accepts_only_itself() {
        let nfa = nfa_for(vec![Regex::literal(*b"ab")]);
        let (dfa, diagnostics) = build_dfa(&nfa);
        assert!(diagnostics.is_empty());
        assert_eq!(dfa.simulate(b"ab"), Some((0, 2)));
        assert_eq!(dfa.simulate(b"a"), None);
        assert_eq!(dfa.simulate(b"abc"), Some((0, 2)));
    }

    #[test]
    fn earliest_rule_wins_on_conflict() {
        let nfa = nfa_for(vec![
            Regex::char_set(CharSet::alnum_underscore()).plus(),
            Regex::literal(*b"if"),
        ]);
        let (dfa, diagnostics) = build_dfa(&nfa);
        assert_eq!(dfa.simulate(b"if"), Some((0, 2)));
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RuleConflict { winning_rule: 0, losing_rule: 1 })));
    }

    #[test]
    fn longest_match_wins_over_earlier_shorter_accept() {
        let nfa = nfa_for(vec![
            Regex::literal(*b"a"),
            Regex::char_set(CharSet::singleton(b'a')).plus(),
        ]);
        let (dfa, _) = build_dfa(&nfa);
        assert_eq!(dfa.simulate(b"aaa"), Some((1, 3)));
    }
}
