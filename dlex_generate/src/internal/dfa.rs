//! This module contains the subset construction algorithm that turns the
//! multi-token ε-NFA into a DFA.
//!
//! DFA states correspond to canonicalised sets of NFA states. When such a
//! set contains terminal states of several tokens, the DFA state takes the
//! kind of the one with the smallest NFA state id, i.e. the earliest
//! declared token. This is what makes keywords beat identifiers and, among
//! equals, the first declaration win.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use dlex::TokenKind;

use super::ids::StateId;
use super::nfa::Nfa;

/// Convert the ε-NFA into a DFA. Consumes the NFA.
///
/// The DFA's start state is the ε-closure of Q₀ and always receives id 0.
/// States are discovered breadth first; for every state the outgoing bytes
/// are processed in ascending order, so the construction is deterministic
/// and every state's edge list is sorted by byte.
pub(crate) fn build_dfa(nfa: Nfa) -> Nfa {
    let mut dfa = Nfa::new_dfa();
    // Maps each canonical NFA state set to its DFA state.
    let mut memo: FxHashMap<Vec<StateId>, StateId> = FxHashMap::default();
    // The NFA state set of each DFA state, indexed by DFA state id.
    let mut sets: Vec<Vec<StateId>> = Vec::new();
    let mut work_list: VecDeque<StateId> = VecDeque::new();

    let start_set = nfa.epsilon_closure(&[nfa.start_state()]);
    add_state(
        &nfa, &mut dfa, &mut memo, &mut sets, &mut work_list, start_set,
    );

    while let Some(dfa_state) = work_list.pop_front() {
        let nfa_states = sets[dfa_state].clone();

        // Bucket every outgoing byte edge of the set's members; the BTreeMap
        // yields the bytes in ascending order.
        let mut moves: BTreeMap<u8, Vec<StateId>> = BTreeMap::new();
        for nfa_state in &nfa_states {
            for (byte, target) in nfa.states()[nfa_state.as_usize()].byte_edges() {
                moves.entry(*byte).or_default().push(*target);
            }
        }

        for (byte, targets) in moves {
            let target_set = nfa.epsilon_closure(&targets);
            let target_state = add_state(
                &nfa, &mut dfa, &mut memo, &mut sets, &mut work_list, target_set,
            );
            dfa.add_byte_edge(dfa_state, byte, target_state);
        }
    }

    debug!("subset construction: {} -> {} states", nfa.len(), dfa.len());
    dfa
}

/// Intern a canonical NFA state set as a DFA state. New states inherit the
/// kind of the smallest terminal member and are queued for processing.
fn add_state(
    nfa: &Nfa,
    dfa: &mut Nfa,
    memo: &mut FxHashMap<Vec<StateId>, StateId>,
    sets: &mut Vec<Vec<StateId>>,
    work_list: &mut VecDeque<StateId>,
    nfa_states: Vec<StateId>,
) -> StateId {
    if let Some(state) = memo.get(&nfa_states) {
        return *state;
    }

    let state = dfa.new_state();
    // The set is sorted, so the first terminal member is the one with the
    // smallest id and thereby the highest priority.
    let kind = nfa_states
        .iter()
        .map(|s| nfa.kind_of(*s))
        .find(|kind| kind.is_terminal())
        .unwrap_or(TokenKind::UNKNOWN);
    dfa.set_kind(state, kind);

    trace!("dfa state {} = {:?} kind {}", state, nfa_states, kind);
    memo.insert(nfa_states.clone(), state);
    sets.push(nfa_states);
    work_list.push_back(state);
    state
}
