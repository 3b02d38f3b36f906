use thiserror::Error;

/// The result type for the `dlex` crate.
pub type Result<T> = std::result::Result<T, DlexError>;

/// The error type for the `dlex` crate.
#[derive(Error, Debug)]
pub struct DlexError {
    /// The source of the error.
    pub source: Box<DlexErrorKind>,
}

impl DlexError {
    /// Create a new `DlexError`.
    pub fn new(kind: DlexErrorKind) -> Self {
        DlexError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &DlexErrorKind {
        &self.source
    }
}

impl std::fmt::Display for DlexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum DlexErrorKind {
    /// The scanner stalled on a byte for which no token prefix exists.
    /// Carries the offending byte and its offset in the input buffer.
    #[error("unexpected symbol 0x{byte:02X} at offset {offset}")]
    UnexpectedSymbol {
        /// The byte that has no outgoing transition.
        byte: u8,
        /// The byte offset of the stall position in the haystack.
        offset: usize,
    },

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<std::io::Error> for DlexError {
    fn from(error: std::io::Error) -> Self {
        DlexError::new(DlexErrorKind::IoError(error))
    }
}
