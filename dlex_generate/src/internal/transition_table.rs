//! This module contains the dense transition table built from the minimised
//! DFA. It is the shared substrate of both emission modes and of the
//! interpreted in-process tables: whatever consumes it sees the same
//! δ/κ functions.

use dlex::TokenKind;

use super::nfa::Nfa;
use crate::{GenError, GenErrorKind, Result};

/// The emitter limit on the state count. The compact format stores state
/// ids in at most 16 bits, and the invalid sentinel |S| must fit as well.
const MAX_STATES: usize = 0xFFFF;

/// A dense |S|×256 transition matrix plus the per-state kind vector.
///
/// Absent transitions hold the invalid sentinel, which equals the state
/// count and is itself never a valid state index.
#[derive(Debug, Clone)]
pub(crate) struct TransitionTable {
    rows: Vec<[u32; 256]>,
    kinds: Vec<u16>,
    start: u32,
}

impl TransitionTable {
    /// Flatten a DFA into the dense representation.
    pub(crate) fn from_dfa(dfa: &Nfa) -> Result<Self> {
        if !dfa.is_dfa() {
            return Err(GenError::new(GenErrorKind::NotADfa(
                "table construction requires a determinised automaton".to_string(),
            )));
        }
        check_capacity(dfa.len())?;

        let invalid = dfa.len() as u32;
        let mut rows = vec![[invalid; 256]; dfa.len()];
        let mut kinds = vec![TokenKind::UNKNOWN.id(); dfa.len()];
        for (i, state) in dfa.states().iter().enumerate() {
            for (byte, target) in state.byte_edges() {
                rows[i][*byte as usize] = target.id();
            }
            kinds[i] = state.kind().id();
        }
        Ok(Self {
            rows,
            kinds,
            start: dfa.start_state().id(),
        })
    }

    /// The number of states.
    pub(crate) fn state_count(&self) -> usize {
        self.rows.len()
    }

    /// The start state.
    pub(crate) fn start_state(&self) -> u32 {
        self.start
    }

    /// The invalid/trap sentinel, equal to the state count.
    pub(crate) fn invalid_state(&self) -> u32 {
        self.rows.len() as u32
    }

    /// The transition function over the dense matrix.
    pub(crate) fn delta(&self, state: u32, byte: u8) -> u32 {
        self.rows
            .get(state as usize)
            .map_or(self.invalid_state(), |row| row[byte as usize])
    }

    /// The kind lookup function.
    pub(crate) fn kind_of(&self, state: u32) -> u16 {
        self.kinds
            .get(state as usize)
            .copied()
            .unwrap_or(TokenKind::UNKNOWN.id())
    }

    /// One matrix row.
    pub(crate) fn row(&self, state: usize) -> &[u32; 256] {
        &self.rows[state]
    }

    /// The per-state kind vector.
    pub(crate) fn kinds(&self) -> &[u16] {
        &self.kinds
    }

    /// The Rust type of one table cell: the smallest unsigned integer type
    /// that can hold the invalid sentinel.
    pub(crate) fn cell_type(&self) -> &'static str {
        cell_type_for(self.state_count())
    }
}

/// Reject automatons beyond the capacity of the compact emitted format.
pub(crate) fn check_capacity(state_count: usize) -> Result<()> {
    if state_count > MAX_STATES {
        return Err(GenError::new(GenErrorKind::CapacityExceeded(state_count)));
    }
    Ok(())
}

/// The cell type for a given state count.
pub(crate) fn cell_type_for(state_count: usize) -> &'static str {
    if state_count <= u8::MAX as usize {
        "u8"
    } else {
        "u16"
    }
}
