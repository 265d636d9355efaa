//! Hopcroft partition refinement, generalized to multiple per-rule accept
//! classes.
//!
//! The refinement loop itself — including the "push whichever half of a
//! split is already queued is replaced, otherwise push the smaller half"
//! optimization — is a direct generalization of `dandy`'s own
//! `state_equivalence_classes_idx`. The difference from that original is
//! the initial partition: `dandy` only distinguished accepting from
//! non-accepting states, which is correct for a single-pattern automaton
//! but would incorrectly merge states accepting different rules here. This
//! version seeds one block per distinct `rule_of` value plus one block for
//! every non-accepting state, so minimization can never blur which rule a
//! merged state belongs to.

use super::Dfa;
use crate::charset::BYTE_MAX;
use std::collections::BTreeSet;

pub fn minimize(dfa: &Dfa) -> Dfa {
    let state_count = dfa.state_count();
    let partition = initial_partition(dfa);
    let partition = refine(dfa, partition);
    rebuild(dfa, partition, state_count)
}

fn initial_partition(dfa: &Dfa) -> Vec<BTreeSet<usize>> {
    let mut by_rule: std::collections::BTreeMap<i64, BTreeSet<usize>> = std::collections::BTreeMap::new();
    for state in 0..dfa.state_count() {
        let key = dfa.rule_of_raw(state); // -1 groups every non-accepting state together
        by_rule.entry(key).or_default().insert(state);
    }
    by_rule.into_values().collect()
}

fn refine(dfa: &Dfa, initial: Vec<BTreeSet<usize>>) -> Vec<BTreeSet<usize>> {
    let mut p = initial.clone();
    let mut w = initial;

    while let Some(a) = w.pop() {
        for byte in 0..BYTE_MAX {
            let byte = byte as u8;
            let x: BTreeSet<usize> = (0..dfa.state_count())
                .filter(|&s| matches!(dfa.transition(s, byte), Some(t) if a.contains(&t)))
                .collect();
            if x.is_empty() {
                continue;
            }
            p = p
                .into_iter()
                .flat_map(|y| {
                    let inter: BTreeSet<usize> = x.intersection(&y).copied().collect();
                    let diff: BTreeSet<usize> = y.difference(&x).copied().collect();
                    if !inter.is_empty() && !diff.is_empty() {
                        if let Some(idx) = w.iter().position(|block| block == &y) {
                            w.swap_remove(idx);
                            w.push(inter.clone());
                            w.push(diff.clone());
                        } else if inter.len() <= diff.len() {
                            w.push(inter.clone());
                        } else {
                            w.push(diff.clone());
                        }
                        vec![inter, diff]
                    } else {
                        vec![y]
                    }
                })
                .collect();
        }
    }
    p
}

fn rebuild(dfa: &Dfa, mut partition: Vec<BTreeSet<usize>>, _old_state_count: usize) -> Dfa {
    // Deterministic final numbering: order blocks by their minimum original
    // state id, using a stable sort so ties (which cannot occur, since
    // blocks are disjoint) would preserve discovery order regardless.
    partition.sort_by_key(|block| *block.iter().min().expect("partition blocks are non-empty"));

    let new_count = partition.len();
    let mut old_to_new = vec![0usize; dfa.state_count()];
    for (new_id, block) in partition.iter().enumerate() {
        for &old_state in block {
            old_to_new[old_state] = new_id;
        }
    }

    let mut transition = vec![-1i64; new_count * BYTE_MAX];
    let mut accept = vec![false; new_count];
    let mut rule_of = vec![-1i64; new_count];

    for (new_id, block) in partition.iter().enumerate() {
        let representative = *block.iter().next().expect("partition blocks are non-empty");
        for byte in 0..BYTE_MAX {
            if let Some(target) = dfa.transition(representative, byte as u8) {
                transition[new_id * BYTE_MAX + byte] = old_to_new[target] as i64;
            }
        }
        accept[new_id] = dfa.accept_raw(representative);
        rule_of[new_id] = dfa.rule_of_raw(representative);
    }

    Dfa::from_parts(new_count, transition, accept, rule_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::subset::build_dfa;

    fn dfa_for(rules: Vec<crate::regex::Regex>) -> Dfa {
        use crate::nfa::builder::NfaBuilder;
        let mut builder = NfaBuilder::new();
        for (rule_index, regex) in rules.into_iter().enumerate() {
            let s0 = builder.fresh_node();
            builder.add_start(s0);
            let fragment = regex.build_fragment(&mut builder);
            builder.epsilon(s0, fragment.entry);
            builder.add_end(fragment.exit, rule_index);
        }
        let nfa = builder.build();
        build_dfa(&nfa).0
    }

    #[test]
    fn minimization_preserves_language() {
        use crate::charset::CharSet;
        use crate::regex::Regex;
        let byte_regex = |b: u8| Regex::char_set(CharSet::singleton(b));
        let dfa = dfa_for(vec![byte_regex(b'a').concat(byte_regex(b'b').star())]);
        let mut min = dfa.clone();
        min.minimize();
        for input in [&b"a"[..], b"ab", b"abb", b"b", b""] {
            assert_eq!(dfa.simulate(input), min.simulate(input), "input {:?}", input);
        }
    }

    #[test]
    fn minimization_keeps_distinct_rules_distinguishable() {
        let dfa = dfa_for(vec![
            crate::regex::Regex::literal(*b"if"),
            crate::regex::Regex::literal(*b"in"),
        ]);
        let mut min = dfa.clone();
        min.minimize();
        assert_eq!(min.simulate(b"if"), Some((0, 2)));
        assert_eq!(min.simulate(b"in"), Some((1, 2)));
    }

    #[test]
    fn minimization_does_not_increase_state_count() {
        let dfa = dfa_for(vec![crate::regex::Regex::literal(*b"aaaa")]);
        let mut min = dfa.clone();
        let before = min.state_count();
        min.minimize();
        assert!(min.state_count() <= before);
    }
}
