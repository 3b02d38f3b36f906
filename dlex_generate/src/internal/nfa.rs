//! This module contains the ε-NFA implementation.
//! One arena of states represents the automaton in every pipeline stage:
//! the multi-token NFA, the DFA produced by subset construction and the
//! minimised DFA are all the same type, distinguished by the `is_dfa` flag.
//! Edges are always over single bytes or ε; Unicode is decomposed into
//! UTF-8 byte chains when regex constructs are compiled in.

use log::trace;
use regex_syntax::utf8::{Utf8Sequence, Utf8Sequences};

use dlex::TokenKind;

use super::character_class::CharClass;
use super::ids::StateId;
use super::regex_parser::{parse_regex, Ast};
use crate::Result;

/// A state of the automaton.
///
/// `kind` is [TokenKind::UNKNOWN] for non-terminal states. Byte edges and
/// ε-edges are kept separately; a DFA has no ε-edges and at most one byte
/// edge per symbol.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    kind: TokenKind,
    byte_edges: Vec<(u8, StateId)>,
    epsilon_edges: Vec<StateId>,
}

impl State {
    pub(crate) fn kind(&self) -> TokenKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub(crate) fn byte_edges(&self) -> &[(u8, StateId)] {
        &self.byte_edges
    }

    pub(crate) fn epsilon_edges(&self) -> &[StateId] {
        &self.epsilon_edges
    }
}

/// A fragment of the automaton under construction: the entry and exit state
/// of one compiled regex construct. Both ids refer to the enclosing arena.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubAutomaton {
    pub(crate) entry: StateId,
    pub(crate) exit: StateId,
}

/// The automaton arena.
///
/// State 0 is the global start state Q₀. Token patterns are added one after
/// another; the relative order of their states is the sole source of token
/// priority (earlier declaration ⇒ smaller state ids ⇒ higher priority).
#[derive(Debug, Clone)]
pub(crate) struct Nfa {
    states: Vec<State>,
    start_state: StateId,
    is_dfa: bool,
}

impl Nfa {
    /// Create an empty automaton holding only the start state Q₀.
    pub(crate) fn new() -> Self {
        Self {
            states: vec![State::default()],
            start_state: StateId::new(0),
            is_dfa: false,
        }
    }

    /// Create an automaton that already carries the DFA invariants. Used by
    /// subset construction and the minimiser for their result arenas.
    pub(crate) fn new_dfa() -> Self {
        Self {
            states: Vec::new(),
            start_state: StateId::new(0),
            is_dfa: true,
        }
    }

    pub(crate) fn start_state(&self) -> StateId {
        self.start_state
    }

    pub(crate) fn is_dfa(&self) -> bool {
        self.is_dfa
    }

    pub(crate) fn states(&self) -> &[State] {
        &self.states
    }

    /// The number of states.
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn kind_of(&self, state: StateId) -> TokenKind {
        self.states[state].kind()
    }

    pub(crate) fn new_state(&mut self) -> StateId {
        let id = StateId::new(self.states.len() as u32);
        self.states.push(State::default());
        id
    }

    pub(crate) fn add_byte_edge(&mut self, from: StateId, byte: u8, to: StateId) {
        debug_assert!(to.as_usize() < self.states.len());
        self.states[from].byte_edges.push((byte, to));
    }

    pub(crate) fn add_epsilon_edge(&mut self, from: StateId, to: StateId) {
        debug_assert!(!self.is_dfa);
        self.states[from].epsilon_edges.push(to);
    }

    pub(crate) fn set_kind(&mut self, state: StateId, kind: TokenKind) {
        self.states[state].set_kind(kind);
    }

    /// Add a literal token: one state per byte of the string, no ε-edges
    /// inside the chain. The final state is marked with the token kind.
    pub(crate) fn add_raw_string(&mut self, text: &str, kind: TokenKind) {
        let entry = self.new_state();
        let mut cur = entry;
        for byte in text.as_bytes() {
            let next = self.new_state();
            self.add_byte_edge(cur, *byte, next);
            cur = next;
        }
        self.set_kind(cur, kind);
        self.add_epsilon_edge(self.start_state, entry);
        trace!("added raw string {:?} as kind {}", text, kind);
    }

    /// Compile a regex pattern and add it as a token. The fragment's exit
    /// state is marked with the token kind and its entry is spliced under
    /// Q₀ with an ε-edge.
    pub(crate) fn add_regex(&mut self, pattern: &str, kind: TokenKind) -> Result<()> {
        let ast = parse_regex(pattern).map_err(|e| e.with_pattern(pattern))?;
        let fragment = self.compile_ast(&ast);
        self.set_kind(fragment.exit, kind);
        self.add_epsilon_edge(self.start_state, fragment.entry);
        trace!("added regex {:?} as kind {}", pattern, kind);
        Ok(())
    }

    /// Thompson construction of one Ast node.
    fn compile_ast(&mut self, ast: &Ast) -> SubAutomaton {
        match ast {
            Ast::Empty => {
                let state = self.new_state();
                SubAutomaton {
                    entry: state,
                    exit: state,
                }
            }
            Ast::Literal(c) => {
                let entry = self.new_state();
                let exit = self.add_utf8_chain(entry, *c);
                SubAutomaton { entry, exit }
            }
            Ast::Class(class) => self.compile_class(class),
            Ast::Concat(parts) => {
                let mut fragments = Vec::with_capacity(parts.len());
                for part in parts {
                    fragments.push(self.compile_ast(part));
                }
                for pair in fragments.windows(2) {
                    self.add_epsilon_edge(pair[0].exit, pair[1].entry);
                }
                SubAutomaton {
                    entry: fragments[0].entry,
                    exit: fragments[fragments.len() - 1].exit,
                }
            }
            Ast::Alternation(branches) => {
                let entry = self.new_state();
                let exit = self.new_state();
                for branch in branches {
                    let fragment = self.compile_ast(branch);
                    self.add_epsilon_edge(entry, fragment.entry);
                    self.add_epsilon_edge(fragment.exit, exit);
                }
                SubAutomaton { entry, exit }
            }
            Ast::ZeroOrOne(inner) => {
                let fragment = self.compile_ast(inner);
                self.add_epsilon_edge(fragment.entry, fragment.exit);
                fragment
            }
            Ast::ZeroOrMore(inner) => {
                let fragment = self.compile_ast(inner);
                let entry = self.new_state();
                let exit = self.new_state();
                self.add_epsilon_edge(entry, exit);
                self.add_epsilon_edge(fragment.exit, exit);
                self.add_epsilon_edge(exit, fragment.entry);
                SubAutomaton { entry, exit }
            }
            Ast::OneOrMore(inner) => {
                let fragment = self.compile_ast(inner);
                let entry = self.new_state();
                let exit = self.new_state();
                self.add_epsilon_edge(entry, fragment.entry);
                self.add_epsilon_edge(fragment.exit, exit);
                self.add_epsilon_edge(fragment.exit, fragment.entry);
                SubAutomaton { entry, exit }
            }
        }
    }

    /// Compile a character class into a fragment with one shared entry and
    /// exit.
    ///
    /// Every scalar-value range is decomposed into UTF-8 byte-range
    /// sequences, each contributing a short chain between entry and exit.
    /// Single-byte alternatives connect the two directly. This keeps even
    /// the full-Unicode class at a few dozen states.
    fn compile_class(&mut self, class: &CharClass) -> SubAutomaton {
        let entry = self.new_state();
        let exit = self.new_state();
        for (lo, hi) in class.scalar_ranges() {
            // Scalar ranges never include surrogates, so the bounds are
            // valid chars by construction.
            let (Some(lo), Some(hi)) = (char::from_u32(lo), char::from_u32(hi)) else {
                continue;
            };
            for sequence in Utf8Sequences::new(lo, hi) {
                self.add_byte_range_chain(entry, exit, &sequence);
            }
        }
        SubAutomaton { entry, exit }
    }

    /// Add one UTF-8 byte-range sequence as a chain between `entry` and
    /// `exit`, expanding every byte range into individual byte edges.
    fn add_byte_range_chain(&mut self, entry: StateId, exit: StateId, sequence: &Utf8Sequence) {
        let ranges = sequence.as_slice();
        let mut cur = entry;
        for (i, range) in ranges.iter().enumerate() {
            let next = if i + 1 == ranges.len() {
                exit
            } else {
                self.new_state()
            };
            for byte in range.start..=range.end {
                self.add_byte_edge(cur, byte, next);
            }
            cur = next;
        }
    }

    /// Add the UTF-8 byte chain of a single code point starting at `from`;
    /// returns the final state of the chain.
    fn add_utf8_chain(&mut self, from: StateId, c: char) -> StateId {
        let mut buf = [0u8; 4];
        let bytes = c.encode_utf8(&mut buf).as_bytes();
        let mut cur = from;
        for byte in bytes {
            let next = self.new_state();
            self.add_byte_edge(cur, *byte, next);
            cur = next;
        }
        cur
    }

    /// Look up the target of the byte edge `(state, byte)`, if any. Only
    /// meaningful on a DFA, where at most one such edge exists.
    pub(crate) fn delta(&self, state: StateId, byte: u8) -> Option<StateId> {
        debug_assert!(self.is_dfa);
        self.states[state]
            .byte_edges()
            .iter()
            .find(|(b, _)| *b == byte)
            .map(|(_, target)| *target)
    }

    /// Calculate the ε-closure of a set of states: every state reachable
    /// from the set by zero or more ε-edges. The result is sorted and
    /// duplicate free, i.e. the canonical form used as subset-construction
    /// key.
    pub(crate) fn epsilon_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut closure = states.to_vec();
        let mut i = 0;
        while i < closure.len() {
            let current = closure[i];
            for target in self.states[current].epsilon_edges() {
                if !closure.contains(target) {
                    closure.push(*target);
                }
            }
            i += 1;
        }
        closure.sort_unstable();
        closure.dedup();
        closure
    }
}
