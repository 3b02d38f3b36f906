//! This module contains the runtime lexer.
//! The lexer drives an emitted DFA over a UTF-8 haystack and produces tokens
//! by longest match.

use log::trace;

use crate::{DfaTables, DlexError, DlexErrorKind, Position, Result, Span, Token, TokenKind};

/// The UTF-8 byte order mark. Skipped when it starts the haystack.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A longest-match lexer over a UTF-8 haystack.
///
/// The lexer consults the emitted transition and kind tables only; it never
/// decodes UTF-8 itself. Reads past the end of the haystack yield the null
/// byte, which the DFA maps to the `eof` token, so the haystack does not
/// need an explicit terminator.
///
/// * `'h` represents the lifetime of the haystack being scanned.
#[derive(Debug)]
pub struct Lexer<'h, T> {
    tables: T,
    input: &'h str,
    // Current scan position, a byte offset into the haystack.
    pos: usize,
    // If set, `comment` tokens are returned instead of being skipped.
    retain_comments: bool,
}

impl<'h, T> Lexer<'h, T>
where
    T: DfaTables,
{
    /// Create a new lexer over the given haystack.
    ///
    /// A UTF-8 byte order mark at the start of the haystack is consumed
    /// here and never produces a token.
    pub fn new(tables: T, input: &'h str) -> Self {
        let pos = if input.as_bytes().starts_with(UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };
        Self {
            tables,
            input,
            pos,
            retain_comments: false,
        }
    }

    /// Configure whether `comment` tokens are returned or skipped.
    /// They are skipped by default, like `gap` tokens.
    pub fn with_retain_comments(mut self, retain_comments: bool) -> Self {
        self.retain_comments = retain_comments;
        self
    }

    /// Get the haystack.
    pub fn input(&self) -> &'h str {
        self.input
    }

    /// Get the current scan position as a byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Get the source text of a token.
    ///
    /// The `eof` token has an empty spelling.
    pub fn spelling(&self, token: &Token) -> &'h str {
        token.span().text(self.input)
    }

    /// Return the next significant token.
    ///
    /// Tokens of kind `gap` are always skipped; tokens of kind `comment`
    /// are skipped unless the lexer retains them. After the `eof` token
    /// has been returned once, every further call returns `eof` again.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let token = self.lex_token()?;
            if token.is(TokenKind::GAP) {
                continue;
            }
            if token.is(TokenKind::COMMENT) && !self.retain_comments {
                continue;
            }
            return Ok(token);
        }
    }

    /// Returns an iterator over all tokens of the haystack, up to and
    /// including `eof`. The iterator fuses after `eof` or the first error.
    pub fn tokens(&mut self) -> Tokens<'h, '_, T> {
        Tokens {
            lexer: self,
            done: false,
        }
    }

    /// Lex exactly one token, including `gap` and `comment` tokens.
    ///
    /// This is the longest-match loop: advance through the DFA until it
    /// stalls, back up over the byte that stalled it and emit the kind of
    /// the last state. Every byte is read at most twice.
    pub fn lex_token(&mut self) -> Result<Token> {
        let tok_start = self.pos;
        let invalid = self.tables.invalid_state_id();
        let mut cur = self.tables.start_state_id();
        let mut prev;

        loop {
            prev = cur;
            cur = self.tables.delta(cur, self.byte_at(self.pos));
            self.pos += 1;
            if cur == invalid {
                break;
            }
        }
        // The byte that stalled the DFA stays unconsumed.
        self.pos -= 1;

        let kind = self.tables.kind_of(prev);
        if kind == TokenKind::UNKNOWN {
            // No terminal state was ever entered.
            return Err(DlexError::new(DlexErrorKind::UnexpectedSymbol {
                byte: self.byte_at(self.pos),
                offset: self.pos,
            }));
        }

        if kind == TokenKind::EOF {
            // The null byte that produced `eof` is virtual. Park the
            // position on it so that further calls keep yielding `eof`.
            self.pos = tok_start;
            return Ok(Token::new(kind, Span::empty_at(tok_start)));
        }

        let token = Token::new(kind, Span::new(tok_start, self.pos));
        trace!("lexed {:?} '{}'", token, self.spelling(&token));
        Ok(token)
    }

    /// Read the byte at the given offset. Offsets at or past the end of
    /// the haystack yield the null byte.
    #[inline]
    fn byte_at(&self, offset: usize) -> u8 {
        self.input.as_bytes().get(offset).copied().unwrap_or(0)
    }
}

impl<T> Lexer<'_, T> {
    /// Compute the line and column of a byte offset by scanning the
    /// haystack. Meant for diagnostics, not for the hot loop.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.input.len());
        let prefix = &self.input.as_bytes()[..offset];
        let line_start = prefix
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line = prefix.iter().filter(|b| **b == b'\n').count() + 1;
        // Count characters, not bytes; the offset may sit inside a UTF-8
        // sequence, so count lead bytes instead of slicing into a &str.
        let column = prefix[line_start..]
            .iter()
            .filter(|b| (**b & 0xC0) != 0x80)
            .count()
            + 1;
        Position::new(line, column)
    }
}

/// An iterator over the tokens of a haystack.
///
/// Yields every significant token and finally the `eof` token, then fuses.
/// An error fuses the iterator as well.
///
/// This iterator can be created with the [`Lexer::tokens`] method.
#[derive(Debug)]
pub struct Tokens<'h, 'l, T> {
    lexer: &'l mut Lexer<'h, T>,
    done: bool,
}

impl<T> Iterator for Tokens<'_, '_, T>
where
    T: DfaTables,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.lexer.next_token();
        match &result {
            Ok(token) if token.is_eof() => self.done = true,
            Err(_) => self.done = true,
            _ => {}
        }
        Some(result)
    }
}
