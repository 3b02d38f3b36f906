//! Module with the token kind and token types shared between the generator
//! and the runtime lexer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Span;

/// A token kind number.
///
/// Kinds are assigned by the token catalogue: the four reserved kinds come
/// first, user-declared kinds follow in declaration order starting at
/// [TokenKind::FIRST_USER]. The numeric value is what the generated kind
/// table stores per DFA state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenKind(u16);

impl TokenKind {
    /// Marks a non-terminal DFA state. Never emitted as a token.
    pub const UNKNOWN: TokenKind = TokenKind(0);
    /// The end-of-input token, matched on the terminating null byte.
    pub const EOF: TokenKind = TokenKind(1);
    /// Whitespace between tokens, skipped by the lexer.
    pub const GAP: TokenKind = TokenKind(2);
    /// Comments, skipped by the lexer unless it retains them.
    pub const COMMENT: TokenKind = TokenKind(3);
    /// The first kind value available to user-declared tokens.
    pub const FIRST_USER: TokenKind = TokenKind(4);

    /// Create a new token kind.
    #[inline]
    pub const fn new(kind: u16) -> Self {
        TokenKind(kind)
    }

    /// Get the kind as u16.
    #[inline]
    pub const fn id(&self) -> u16 {
        self.0
    }

    /// Get the kind as usize, e.g. for indexing a name table.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Check whether this kind marks a terminal state.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        self.0 != Self::UNKNOWN.0
    }
}

impl From<u16> for TokenKind {
    fn from(kind: u16) -> Self {
        TokenKind(kind)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lexed token: a kind plus the byte span it covers in the haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Get the kind of the token.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Get the span of the token.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the start offset of the token.
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Get the end offset of the token.
    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Get the length of the token in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Check if the token covers no bytes. True for `eof`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Check the token against a kind.
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Check the token against several kinds at once, e.g. when a parser
    /// accepts any of a set of keywords.
    #[inline]
    pub fn is_one_of(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Check if this is the end-of-input token.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }
}
