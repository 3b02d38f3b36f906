/// Module that provides the character class representation.
mod character_class;

/// Module with the subset construction algorithm.
pub(crate) mod dfa;

/// Module with conversion to graphviz dot format.
#[cfg(feature = "dot_writer")]
pub(crate) mod dot;

/// Module with the code emitter.
pub(crate) mod emitter;

/// Module for the state id type.
mod ids;

/// Module with the DFA minimisation.
pub(crate) mod minimizer;

/// The nfa module contains the automaton arena and the Thompson
/// construction.
pub(crate) mod nfa;

/// The parser module contains the restricted regex dialect parser.
mod regex_parser;

/// Module with the dense transition table shared by the emitters and the
/// interpreted runtime tables.
pub(crate) mod transition_table;
