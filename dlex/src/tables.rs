//! Module with the table interface between the generator's emitted artefact
//! and the runtime lexer.

use crate::TokenKind;

/// The interface of an emitted DFA: the transition function, the kind lookup
/// function and the two state constants.
///
/// The lexer is generic over this trait so that it can run equally well on
/// code generated by `dlex-gen` and on the interpreted in-memory tables the
/// generator produces for in-process use.
pub trait DfaTables {
    /// The start state of the DFA.
    fn start_state_id(&self) -> u32;

    /// The invalid/trap sentinel. Equal to the state count of the DFA;
    /// never a valid state index.
    fn invalid_state_id(&self) -> u32;

    /// The transition function δ(state, byte). Returns
    /// [DfaTables::invalid_state_id] when the state has no transition on
    /// the byte.
    fn delta(&self, state: u32, byte: u8) -> u32;

    /// The kind lookup function κ(state). [TokenKind::UNKNOWN] marks a
    /// non-terminal state.
    fn kind_of(&self, state: u32) -> TokenKind;
}

impl<T: DfaTables + ?Sized> DfaTables for &T {
    #[inline]
    fn start_state_id(&self) -> u32 {
        (**self).start_state_id()
    }

    #[inline]
    fn invalid_state_id(&self) -> u32 {
        (**self).invalid_state_id()
    }

    #[inline]
    fn delta(&self, state: u32, byte: u8) -> u32 {
        (**self).delta(state, byte)
    }

    #[inline]
    fn kind_of(&self, state: u32) -> TokenKind {
        (**self).kind_of(state)
    }
}

/// Emitted-artefact adapter: two constants and two function pointers, the
/// shape a consumer wires up from a source file generated by `dlex-gen`.
///
/// ```
/// use dlex::StaticDfaTables;
///
/// // Items as they appear in a generated file:
/// const DFA_START_STATE_ID: u32 = 0;
/// const DFA_INVALID_STATE_ID: u32 = 2;
/// fn dfa_delta(state: u32, byte: u8) -> u32 {
///     match (state, byte) {
///         (0, b'a') => 1,
///         _ => DFA_INVALID_STATE_ID,
///     }
/// }
/// fn dfa_get_kind(state: u32) -> u16 {
///     if state == 1 {
///         4
///     } else {
///         0
///     }
/// }
///
/// let tables = StaticDfaTables::new(
///     DFA_START_STATE_ID,
///     DFA_INVALID_STATE_ID,
///     dfa_delta,
///     dfa_get_kind,
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StaticDfaTables {
    start_state_id: u32,
    invalid_state_id: u32,
    delta: fn(u32, u8) -> u32,
    get_kind: fn(u32) -> u16,
}

impl StaticDfaTables {
    /// Create a table set from the four items of an emitted artefact.
    pub fn new(
        start_state_id: u32,
        invalid_state_id: u32,
        delta: fn(u32, u8) -> u32,
        get_kind: fn(u32) -> u16,
    ) -> Self {
        Self {
            start_state_id,
            invalid_state_id,
            delta,
            get_kind,
        }
    }
}

impl DfaTables for StaticDfaTables {
    #[inline]
    fn start_state_id(&self) -> u32 {
        self.start_state_id
    }

    #[inline]
    fn invalid_state_id(&self) -> u32 {
        self.invalid_state_id
    }

    #[inline]
    fn delta(&self, state: u32, byte: u8) -> u32 {
        (self.delta)(state, byte)
    }

    #[inline]
    fn kind_of(&self, state: u32) -> TokenKind {
        TokenKind::new((self.get_kind)(state))
    }
}
