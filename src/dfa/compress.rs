//! Equivalence-class byte compression.
//!
//! Two bytes are equivalent for a given DFA if every state transitions on
//! them identically — i.e. their columns in the transition table are equal.
//! Rather than storing all 256 columns, [`compress`] assigns each distinct
//! column a small class id and stores only `state_count * class_count`
//! entries, plus a 256-entry `classifier` mapping each byte to its class.
//! The invariant `dfa.transition(s, b) == classes.transition(s, classifier[b])`
//! holds for every state `s` and byte `b`.

use super::Dfa;
use crate::charset::BYTE_MAX;
use std::collections::HashMap;

/// An equivalence-class-compressed transition table.
#[derive(Debug, Clone)]
pub struct CompressedDfa {
    state_count: usize,
    class_count: usize,
    /// `classifier[byte]` is that byte's equivalence class.
    classifier: [u8; BYTE_MAX],
    /// Row-major `state_count * class_count` table, same `-1` convention
    /// as [`Dfa`]'s own transition table.
    ctransition: Vec<i64>,
    accept: Vec<bool>,
    rule_of: Vec<i64>,
}

impl CompressedDfa {
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn class_of(&self, byte: u8) -> u8 {
        self.classifier[byte as usize]
    }

    pub fn transition(&self, state: usize, byte: u8) -> Option<usize> {
        let class = self.class_of(byte) as usize;
        let target = self.ctransition[state * self.class_count + class];
        (target >= 0).then_some(target as usize)
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accept[state]
    }

    pub fn rule_at(&self, state: usize) -> Option<usize> {
        let r = self.rule_of[state];
        (r >= 0).then_some(r as usize)
    }
}

/// Classifies the 256 bytes by their transition column across every state
/// of `dfa`, in ascending byte order, so the first byte of each class (and
/// therefore the class ids themselves) is deterministic.
pub fn compress(dfa: &Dfa) -> CompressedDfa {
    let mut classifier = [0u8; BYTE_MAX];
    let mut seen: HashMap<Vec<i64>, u8> = HashMap::new();
    let mut columns: Vec<Vec<i64>> = Vec::new();

    for byte in 0..BYTE_MAX {
        let column: Vec<i64> = (0..dfa.state_count())
            .map(|state| dfa.transition_row(state)[byte])
            .collect();
        let class = *seen.entry(column.clone()).or_insert_with(|| {
            columns.push(column);
            (columns.len() - 1) as u8
        });
        classifier[byte] = class;
    }

    let class_count = columns.len();
    let mut ctransition = vec![-1i64; dfa.state_count() * class_count];
    for (class, column) in columns.iter().enumerate() {
        for (state, &target) in column.iter().enumerate() {
            ctransition[state * class_count + class] = target;
        }
    }

    CompressedDfa {
        state_count: dfa.state_count(),
        class_count,
        classifier,
        ctransition,
        accept: (0..dfa.state_count()).map(|s| dfa.accept_raw(s)).collect(),
        rule_of: (0..dfa.state_count()).map(|s| dfa.rule_of_raw(s)).collect(),
    }
}
