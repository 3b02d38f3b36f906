//! Module with the token catalogue: the ordered list of token declarations
//! the generator compiles into a DFA.
//!
//! Declaration order is significant twice over: it determines the numeric
//! token kind of user tokens, and it is the priority order — when two
//! tokens match the same longest prefix, the earlier declaration wins.

use dlex::TokenKind;

use crate::{GenError, GenErrorKind, Result};

/// The pattern of one token declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPattern {
    /// A literal string, matched byte for byte. Metacharacters are not
    /// interpreted.
    Literal(String),
    /// A pattern of the restricted regex dialect.
    Regex(String),
}

/// One token declaration: a name, its kind number and its pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    name: String,
    kind: TokenKind,
    pattern: TokenPattern,
}

impl TokenEntry {
    /// Get the token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the token kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Get the token pattern.
    pub fn pattern(&self) -> &TokenPattern {
        &self.pattern
    }
}

/// The ordered token catalogue.
///
/// Four names are reserved: `unknown` (the non-terminal marker, never
/// declarable), `eof` (declared automatically with the literal pattern
/// `"\0"`), and `gap` and `comment`, which keep their fixed kind numbers
/// but receive their patterns from the catalogue like any other token.
#[derive(Debug, Clone)]
pub struct Catalogue {
    // Declarations in priority order; `eof` is always first.
    entries: Vec<TokenEntry>,
    // Token names indexed by kind number.
    names: Vec<String>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalogue {
    /// Create a catalogue holding only the automatic `eof` declaration.
    pub fn new() -> Self {
        Self {
            entries: vec![TokenEntry {
                name: "eof".to_string(),
                kind: TokenKind::EOF,
                pattern: TokenPattern::Literal("\0".to_string()),
            }],
            names: vec![
                "unknown".to_string(),
                "eof".to_string(),
                "gap".to_string(),
                "comment".to_string(),
            ],
        }
    }

    /// Declare a literal token. Returns the assigned kind.
    pub fn add_literal(&mut self, name: &str, text: &str) -> Result<TokenKind> {
        self.add(name, TokenPattern::Literal(text.to_string()))
    }

    /// Declare a regex token. Returns the assigned kind.
    /// The pattern is compiled later; syntax errors surface when the
    /// catalogue is compiled into an automaton.
    pub fn add_regex(&mut self, name: &str, pattern: &str) -> Result<TokenKind> {
        self.add(name, TokenPattern::Regex(pattern.to_string()))
    }

    fn add(&mut self, name: &str, pattern: TokenPattern) -> Result<TokenKind> {
        if !is_identifier(name) {
            return Err(catalogue_error(format!(
                "token name '{name}' is not an identifier"
            )));
        }
        if name == "unknown" || name == "eof" {
            return Err(catalogue_error(format!(
                "token name '{name}' is reserved and cannot be declared"
            )));
        }
        if self.entries.iter().any(|e| e.name == name) {
            return Err(catalogue_error(format!("duplicate token name '{name}'")));
        }
        let kind = match name {
            "gap" => TokenKind::GAP,
            "comment" => TokenKind::COMMENT,
            _ => {
                self.names.push(name.to_string());
                TokenKind::new((self.names.len() - 1) as u16)
            }
        };
        self.entries.push(TokenEntry {
            name: name.to_string(),
            kind,
            pattern,
        });
        Ok(kind)
    }

    /// The declarations in priority order, starting with `eof`.
    pub fn entries(&self) -> &[TokenEntry] {
        &self.entries
    }

    /// The number of token kinds, including the reserved ones.
    pub fn kind_count(&self) -> usize {
        self.names.len()
    }

    /// The token names indexed by kind number.
    pub fn token_names(&self) -> &[String] {
        &self.names
    }

    /// Look up the name of a kind.
    pub fn name_of(&self, kind: TokenKind) -> Option<&str> {
        self.names.get(kind.as_usize()).map(|s| s.as_str())
    }

    /// Whether the catalogue declares anything besides the automatic `eof`.
    pub fn has_user_tokens(&self) -> bool {
        self.entries.len() > 1
    }

    /// Parse a catalogue file.
    ///
    /// The format is a stream of declarations, one per line:
    ///
    /// ```text
    /// # keywords before the identifier that would swallow them
    /// TOKEN(kw_for, "for")
    /// TOKEN_REGEX(identifier, "[a-zA-Z_][a-zA-Z_0-9]*")
    /// TOKEN_REGEX(gap, "[ \t\r\n]+")
    /// ```
    ///
    /// Literal strings undergo escape processing; regex strings are passed
    /// through to the regex compiler with only `\"` unescaped.
    pub fn parse(text: &str) -> Result<Catalogue> {
        let mut catalogue = Catalogue::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            catalogue
                .parse_line(line)
                .map_err(|e| catalogue_error(format!("line {}: {}", index + 1, e)))?;
        }
        Ok(catalogue)
    }

    fn parse_line(&mut self, line: &str) -> std::result::Result<(), String> {
        let (is_regex, rest) = if let Some(rest) = line.strip_prefix("TOKEN_REGEX") {
            (true, rest)
        } else if let Some(rest) = line.strip_prefix("TOKEN") {
            (false, rest)
        } else {
            return Err(format!("expected TOKEN or TOKEN_REGEX, found '{line}'"));
        };
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix('(')
            .ok_or_else(|| "expected '(' after the declaration keyword".to_string())?;
        let comma = rest
            .find(',')
            .ok_or_else(|| "expected ',' after the token name".to_string())?;
        let name = rest[..comma].trim().to_string();
        let rest = rest[comma + 1..].trim_start();
        let (raw, rest) = parse_quoted(rest)?;
        if rest.trim() != ")" {
            return Err("expected ')' after the pattern string".to_string());
        }
        let outcome = if is_regex {
            self.add_regex(&name, &raw)
        } else {
            let text = unescape_literal(&raw)?;
            self.add_literal(&name, &text)
        };
        outcome.map(|_| ()).map_err(|e| e.to_string())
    }
}

fn catalogue_error(message: String) -> GenError {
    GenError::new(GenErrorKind::CatalogueError(message))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Scan a double-quoted string. Returns the raw content with `\"` reduced
/// to `"` (every other backslash is preserved) and the remaining input.
fn parse_quoted(input: &str) -> std::result::Result<(String, &str), String> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err("expected a double-quoted pattern string".to_string()),
    }
    let mut raw = String::new();
    let mut escaped = false;
    for (offset, c) in chars {
        if escaped {
            if c != '"' {
                raw.push('\\');
            }
            raw.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((raw, &input[offset + 1..]));
        } else {
            raw.push(c);
        }
    }
    Err("unterminated pattern string".to_string())
}

/// Escape processing for literal token strings.
fn unescape_literal(raw: &str) -> std::result::Result<String, String> {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some('v') => text.push('\u{0B}'),
            Some('0') => text.push('\0'),
            Some('"') => text.push('"'),
            Some('\\') => text.push('\\'),
            Some(other) => return Err(format!("unknown escape '\\{other}' in literal")),
            None => return Err("truncated escape in literal".to_string()),
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_automatic() {
        let catalogue = Catalogue::new();
        assert_eq!(catalogue.entries().len(), 1);
        assert_eq!(catalogue.entries()[0].name(), "eof");
        assert_eq!(catalogue.entries()[0].kind(), TokenKind::EOF);
        assert_eq!(
            catalogue.entries()[0].pattern(),
            &TokenPattern::Literal("\0".to_string())
        );
        assert_eq!(catalogue.kind_count(), 4);
        assert!(!catalogue.has_user_tokens());
    }

    #[test]
    fn test_user_kinds_follow_declaration_order() {
        let mut catalogue = Catalogue::new();
        let kw = catalogue.add_literal("kw_for", "for").unwrap();
        let ident = catalogue.add_regex("identifier", "[a-z]+").unwrap();
        assert_eq!(kw, TokenKind::FIRST_USER);
        assert_eq!(ident, TokenKind::new(5));
        assert_eq!(catalogue.name_of(kw), Some("kw_for"));
        assert_eq!(catalogue.name_of(TokenKind::UNKNOWN), Some("unknown"));
    }

    #[test]
    fn test_gap_and_comment_keep_reserved_kinds() {
        let mut catalogue = Catalogue::new();
        catalogue.add_literal("plus", "+").unwrap();
        let gap = catalogue.add_regex("gap", "[ ]+").unwrap();
        let comment = catalogue.add_regex("comment", "//[^\n]*").unwrap();
        assert_eq!(gap, TokenKind::GAP);
        assert_eq!(comment, TokenKind::COMMENT);
        // Priority still follows declaration order: plus comes before gap.
        let names: Vec<_> = catalogue.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["eof", "plus", "gap", "comment"]);
    }

    #[test]
    fn test_reserved_and_duplicate_names_are_rejected() {
        let mut catalogue = Catalogue::new();
        assert!(catalogue.add_literal("unknown", "x").is_err());
        assert!(catalogue.add_literal("eof", "x").is_err());
        assert!(catalogue.add_literal("1bad", "x").is_err());
        catalogue.add_literal("plus", "+").unwrap();
        assert!(catalogue.add_literal("plus", "+").is_err());
        catalogue.add_regex("gap", "[ ]+").unwrap();
        assert!(catalogue.add_regex("gap", "[ ]+").is_err());
    }

    #[test]
    fn test_parse_catalogue_file() {
        let text = r#"
# A small catalogue.
TOKEN(kw_for, "for")
TOKEN(nul, "\0")

TOKEN_REGEX(identifier, "[a-zA-Z_][a-zA-Z_0-9]*")
TOKEN_REGEX(gap, "[ \t]+")
"#;
        let catalogue = Catalogue::parse(text).unwrap();
        let names: Vec<_> = catalogue.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["eof", "kw_for", "nul", "identifier", "gap"]);
        // The literal's escape was processed...
        assert_eq!(
            catalogue.entries()[2].pattern(),
            &TokenPattern::Literal("\0".to_string())
        );
        // ...while the regex keeps its backslash untouched.
        assert_eq!(
            catalogue.entries()[4].pattern(),
            &TokenPattern::Regex("[ \\t]+".to_string())
        );
    }

    #[test]
    fn test_parse_quoted_handles_escaped_quotes() {
        let (raw, rest) = parse_quoted(r#""a\"b")"#).unwrap();
        assert_eq!(raw, "a\"b");
        assert_eq!(rest, ")");
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = Catalogue::parse("TOKEN(a \"b\")").unwrap_err();
        assert!(err.to_string().contains("line 1"));
        let err = Catalogue::parse("\nNOPE(a, \"b\")").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        let err = Catalogue::parse("TOKEN(bad, \"\\q\")").unwrap_err();
        assert!(err.to_string().contains("unknown escape"));
    }
}
