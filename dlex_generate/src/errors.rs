use thiserror::Error;

/// The result type for the `dlex_generate` crate.
pub type Result<T> = std::result::Result<T, GenError>;

/// The error type for the `dlex_generate` crate.
#[derive(Error, Debug)]
pub struct GenError {
    /// The source of the error.
    pub source: Box<GenErrorKind>,
}

impl GenError {
    /// Create a new `GenError`.
    pub fn new(kind: GenErrorKind) -> Self {
        GenError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &GenErrorKind {
        &self.source
    }
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum GenErrorKind {
    /// A regex pattern of the catalogue does not conform to the restricted
    /// dialect. Carries the offending pattern for the diagnostic.
    #[error("'{1}' {0}")]
    RegexSyntaxError(RegexError, String),

    /// The token catalogue itself is malformed.
    #[error("catalogue error: {0}")]
    CatalogueError(String),

    /// A pattern matches the empty string, which would make the scanner
    /// emit zero-length tokens forever.
    #[error("empty tokens are not allowed: the start state is accepting")]
    EmptyToken,

    /// An operation that requires a DFA was invoked on an automaton that
    /// has not been determinised.
    #[error("automaton is not a DFA: {0}")]
    NotADfa(String),

    /// The DFA exceeds the capacity of the compact emitted format.
    #[error("state count {0} exceeds the emitter limit of 65535")]
    CapacityExceeded(usize),

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<std::io::Error> for GenError {
    fn from(error: std::io::Error) -> Self {
        GenError::new(GenErrorKind::IoError(error))
    }
}

/// A syntax error in a regex of the restricted dialect.
///
/// Every variant carries the byte offset of the offending construct within
/// the pattern.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegexError {
    /// A `(` without matching `)` or vice versa.
    #[error("unbalanced parenthesis at offset {0}")]
    UnbalancedParenthesis(usize),

    /// Two quantifiers in a row, e.g. `a*+`.
    #[error("adjacent quantifiers at offset {0}")]
    AdjacentQuantifiers(usize),

    /// A quantifier with nothing to repeat, e.g. a leading `*`.
    #[error("quantifier without a preceding atom at offset {0}")]
    DanglingQuantifier(usize),

    /// A class range whose lower bound exceeds its upper bound.
    #[error("invalid class range at offset {0}: lower bound exceeds upper bound")]
    InvalidRange(usize),

    /// A `[` without a closing `]`.
    #[error("unterminated character class at offset {0}")]
    UnterminatedClass(usize),

    /// A class without content, `[]`.
    #[error("empty character class at offset {0}")]
    EmptyClass(usize),

    /// An escape sequence that the dialect does not define.
    #[error("unknown escape sequence at offset {0}")]
    UnknownEscape(usize),

    /// A `\u`/`\U` escape with the wrong number of hex digits or a
    /// non-hex digit.
    #[error("malformed hex escape at offset {0}: expected {1} hex digits")]
    BadHexDigits(usize, usize),

    /// A code point in the UTF-16 surrogate range.
    #[error("surrogate code point U+{0:04X} at offset {1}")]
    SurrogateCodePoint(u32, usize),

    /// A code point above U+10FFFF.
    #[error("code point U+{0:X} at offset {1} is out of range")]
    CodePointOutOfRange(u32, usize),

    /// A pattern that ends in the middle of an escape sequence.
    #[error("truncated escape sequence at offset {0}")]
    TruncatedEscape(usize),
}

impl RegexError {
    /// Attach the offending pattern, producing a crate error.
    pub(crate) fn with_pattern(self, pattern: &str) -> GenError {
        GenError::new(GenErrorKind::RegexSyntaxError(self, pattern.to_string()))
    }
}
