//! This module contains the DFA minimisation.
//!
//! Minimisation works on a distinguishability matrix over the DFA states
//! plus one virtual dead state that stands in for absent transitions. Two
//! variants refine the matrix to the same fixpoint: an iterative pair scan
//! and a worklist driven by reverse transitions. Equivalence classes under
//! the refined matrix are then collapsed into the states of the minimised
//! DFA.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};

use dlex::TokenKind;

use super::ids::StateId;
use super::nfa::Nfa;
use crate::{GenError, GenErrorKind, Result};

/// The minimisation algorithm to use. Both produce identical partitions;
/// they trade memory for time differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinimizationAlgorithm {
    /// Propagate distinguishability backwards over reverse transitions from
    /// a seeded worklist. Quadratic in the state count, but keeps the full
    /// reverse transition relation in memory.
    #[default]
    ReverseWorklist,
    /// Rescan all state pairs until a fixpoint is reached. Needs no extra
    /// data structures beyond the matrix, at higher time complexity.
    PairRefinement,
}

/// Minimise a DFA. Consumes the input automaton and returns an equivalent
/// automaton with the minimal number of states and the same token kind
/// labelling.
///
/// With `unify_kinds`, terminal states of different kinds may be merged
/// when they are otherwise equivalent; a collapsed state then takes the
/// smallest kind value of its members.
pub(crate) fn build_minimized_dfa(
    dfa: Nfa,
    algorithm: MinimizationAlgorithm,
    unify_kinds: bool,
) -> Result<Nfa> {
    if !dfa.is_dfa() {
        return Err(GenError::new(GenErrorKind::NotADfa(
            "minimisation requires a determinised automaton".to_string(),
        )));
    }

    let n = dfa.len();
    let dead = n;

    // Dense transition rows, with the dead state for absent transitions.
    let mut delta = vec![[dead; 256]; n];
    for (i, state) in dfa.states().iter().enumerate() {
        for (byte, target) in state.byte_edges() {
            delta[i][*byte as usize] = target.as_usize();
        }
    }

    let mut matrix = init_matrix(&dfa, unify_kinds);
    match algorithm {
        MinimizationAlgorithm::PairRefinement => refine_pairs(&mut matrix, &delta, n),
        MinimizationAlgorithm::ReverseWorklist => propagate_worklist(&mut matrix, &delta, n),
    }

    let (class_of, class_count) = collapse_classes(&matrix, n);
    trace!("partition: {:?}", class_of);
    let minimized = rebuild(&dfa, &class_of, class_count, unify_kinds);
    debug!(
        "minimisation ({:?}): {} -> {} states",
        algorithm,
        n,
        minimized.len()
    );
    Ok(minimized)
}

/// The initial matrix: a pair is distinguished when exactly one of the two
/// states is terminal, or when both are terminal with different kinds (the
/// kind clause is suppressed in unify mode). Every real state is
/// distinguished from the virtual dead state.
fn init_matrix(dfa: &Nfa, unify_kinds: bool) -> BitMatrix {
    let n = dfa.len();
    let mut matrix = BitMatrix::new(n + 1);
    for i in 0..n {
        let kind_i = dfa.kind_of(StateId::new(i as u32));
        for j in (i + 1)..n {
            let kind_j = dfa.kind_of(StateId::new(j as u32));
            let distinguished = kind_i.is_terminal() != kind_j.is_terminal()
                || (kind_i.is_terminal() && !unify_kinds && kind_i != kind_j);
            if distinguished {
                matrix.set(i, j);
            }
        }
        matrix.set(i, n);
    }
    matrix
}

/// Iterative refinement: rescan all undistinguished pairs, marking a pair
/// whenever some byte leads it into a distinguished pair, until nothing
/// changes any more.
fn refine_pairs(matrix: &mut BitMatrix, delta: &[[usize; 256]], n: usize) {
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..n {
            for j in (i + 1)..n {
                if matrix.get(i, j) {
                    continue;
                }
                for byte in 0..256 {
                    let target_i = delta[i][byte];
                    let target_j = delta[j][byte];
                    if target_i != target_j && matrix.get(target_i, target_j) {
                        matrix.set(i, j);
                        changed = true;
                        break;
                    }
                }
            }
        }
    }
}

/// Worklist refinement: seed with every initially distinguished pair and
/// propagate backwards over the reverse transition relation. The pair
/// universe includes the dead state, so states whose transitions differ
/// only in presence are distinguished as well.
fn propagate_worklist(matrix: &mut BitMatrix, delta: &[[usize; 256]], n: usize) {
    let dead = n;
    // reverse[byte][target] lists the sources reaching `target` on `byte`.
    let mut reverse: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); n + 1]; 256];
    for (i, row) in delta.iter().enumerate() {
        for (byte, target) in row.iter().enumerate() {
            reverse[byte][*target].push(i);
        }
    }
    for row in reverse.iter_mut() {
        // The dead state maps every byte to itself.
        row[dead].push(dead);
    }

    let mut work_list: VecDeque<(usize, usize)> = VecDeque::new();
    for i in 0..=n {
        for j in (i + 1)..=n {
            if matrix.get(i, j) {
                work_list.push_back((i, j));
            }
        }
    }

    while let Some((i, j)) = work_list.pop_front() {
        for byte in 0..256 {
            for &p in &reverse[byte][i] {
                for &q in &reverse[byte][j] {
                    if p != q && !matrix.get(p, q) {
                        matrix.set(p, q);
                        work_list.push_back((p.min(q), p.max(q)));
                    }
                }
            }
        }
    }
}

/// Group the real states into equivalence classes under the refined matrix.
/// Classes are numbered in ascending order of their smallest member, so the
/// class of state 0 — the start state — is always class 0.
fn collapse_classes(matrix: &BitMatrix, n: usize) -> (Vec<usize>, usize) {
    let mut class_of = vec![usize::MAX; n];
    let mut class_count = 0;
    for i in 0..n {
        if class_of[i] != usize::MAX {
            continue;
        }
        let class = class_count;
        class_count += 1;
        class_of[i] = class;
        for j in (i + 1)..n {
            if class_of[j] == usize::MAX && !matrix.get(i, j) {
                class_of[j] = class;
            }
        }
    }
    (class_of, class_count)
}

/// Build the minimised automaton from the partition.
///
/// The outgoing edges of a class are the union of its members' edges,
/// deduplicated by symbol and emitted in ascending byte order; all members
/// of a class agree on the target classes.
fn rebuild(dfa: &Nfa, class_of: &[usize], class_count: usize, unify_kinds: bool) -> Nfa {
    let mut minimized = Nfa::new_dfa();
    for _ in 0..class_count {
        minimized.new_state();
    }

    let mut class_edges: Vec<BTreeMap<u8, usize>> = vec![BTreeMap::new(); class_count];
    let mut class_kinds: Vec<TokenKind> = vec![TokenKind::UNKNOWN; class_count];

    for (member, state) in dfa.states().iter().enumerate() {
        let class = class_of[member];
        for (byte, target) in state.byte_edges() {
            let target_class = class_of[target.as_usize()];
            let known = class_edges[class].insert(*byte, target_class);
            debug_assert!(
                known.is_none() || known == Some(target_class),
                "class members disagree on the target of byte {byte:#04X}"
            );
        }
        let kind = state.kind();
        if kind.is_terminal() {
            let slot = &mut class_kinds[class];
            debug_assert!(
                unify_kinds || !slot.is_terminal() || *slot == kind,
                "terminal members of a class differ in kind"
            );
            if !slot.is_terminal() || (unify_kinds && kind < *slot) {
                *slot = kind;
            }
        }
    }

    for (class, edges) in class_edges.into_iter().enumerate() {
        minimized.set_kind(StateId::new(class as u32), class_kinds[class]);
        for (byte, target_class) in edges {
            minimized.add_byte_edge(
                StateId::new(class as u32),
                byte,
                StateId::new(target_class as u32),
            );
        }
    }
    minimized
}

/// A square bit matrix storing the symmetric distinguishability relation.
/// Cells are addressed with the normalised pair (min, max); the diagonal is
/// never set.
struct BitMatrix {
    words_per_row: usize,
    bits: Vec<u64>,
}

impl BitMatrix {
    fn new(size: usize) -> Self {
        let words_per_row = size.div_ceil(64);
        Self {
            words_per_row,
            bits: vec![0; words_per_row * size],
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> bool {
        if i == j {
            return false;
        }
        let (row, col) = (i.min(j), i.max(j));
        self.bits[row * self.words_per_row + col / 64] & (1 << (col % 64)) != 0
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize) {
        debug_assert_ne!(i, j);
        let (row, col) = (i.min(j), i.max(j));
        self.bits[row * self.words_per_row + col / 64] |= 1 << (col % 64);
    }
}
