//! Incremental construction of an [`Nfa`] from regex fragments.
//!
//! Each rule's [`Regex::build_fragment`](crate::regex::Regex::build_fragment)
//! call wires a self-contained entry/exit pair into a shared node pool; the
//! builder owns that pool and the bookkeeping (fresh ids, ε-edges, start and
//! end sets) that the fragment-construction rules in
//! [`crate::regex`] rely on.

use super::Nfa;

/// The entry and exit node of one compiled sub-expression. Every
/// [`crate::regex::RegexTree`] variant's construction rule produces exactly
/// one of these; composite variants (`Concat`, `Alt`, ...) wire their
/// children's fragments together and return a new fragment spanning them.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub entry: usize,
    pub exit: usize,
}

impl Fragment {
    pub fn new(entry: usize, exit: usize) -> Fragment {
        Fragment { entry, exit }
    }
}

/// Accumulates nodes and edges while rule fragments are built, then freezes
/// into an immutable [`Nfa`].
#[derive(Debug, Default)]
pub struct NfaBuilder {
    transitions: Vec<Vec<(u8, usize)>>,
    epsilon_adj: Vec<Vec<usize>>,
    starts: Vec<usize>,
    ends: Vec<(usize, usize)>,
}

impl NfaBuilder {
    pub fn new() -> NfaBuilder {
        NfaBuilder::default()
    }

    /// Allocates a new node id and the backing adjacency-list slots for it.
    pub fn fresh_node(&mut self) -> usize {
        self.transitions.push(Vec::new());
        self.epsilon_adj.push(Vec::new());
        self.transitions.len() - 1
    }

    /// Adds a byte-labelled transition `from --byte--> to`.
    pub fn transition(&mut self, from: usize, to: usize, byte: u8) {
        self.transitions[from].push((byte, to));
    }

    /// Adds an ε-transition `from --ε--> to`.
    pub fn epsilon(&mut self, from: usize, to: usize) {
        self.epsilon_adj[from].push(to);
    }

    /// Marks `node` as a start node (one call per rule, wired to that
    /// rule's fragment entry by an ε-edge from a shared super-start in
    /// practice, though the builder itself imposes no such topology).
    pub fn add_start(&mut self, node: usize) {
        self.starts.push(node);
    }

    /// Marks `node` as accepting rule `rule_index`.
    pub fn add_end(&mut self, node: usize, rule_index: usize) {
        self.ends.push((node, rule_index));
    }

    pub fn build(self) -> Nfa {
        Nfa::new(self.transitions, self.epsilon_adj, self.starts, self.ends)
    }
}
