#![forbid(missing_docs)]
//! # `dlex`
//! The `dlex` crate is the runtime half of a DFA-based lexer toolchain.
//! The offline generator (`dlex-gen` from the `dlex_generate` crate) turns a
//! token catalogue into a pair of lookup functions — a transition function
//! δ(state, byte) and a kind lookup κ(state) — plus the start and invalid
//! state constants. This crate consumes that interface and tokenises UTF-8
//! source buffers by longest match.
//!
//! The scanner is byte oriented: all Unicode handling happens at generation
//! time, so the hot loop is a plain table walk that reads every byte at most
//! twice and never backtracks.

/// Module with error definitions
mod errors;
pub use errors::{DlexError, DlexErrorKind, Result};

/// Module that provides the runtime lexer
mod lexer;
pub use lexer::{Lexer, Tokens};

/// Module that provides a position type
mod position;
pub use position::Position;

/// Module that provides a Span type
mod span;
pub use span::Span;

/// Module with the table interface of emitted DFAs
mod tables;
pub use tables::{DfaTables, StaticDfaTables};

/// Module that provides the Token and TokenKind types
mod token;
pub use token::{Token, TokenKind};
