//! Lexer for GraphQL SDL.

use crate::token::{Token, TokenKind};
use schemac_core::Span;

/// A lexer for GraphQL SDL source code.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: u32,
    /// Why the last `Error` token was produced.
    error: Option<String>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            error: None,
        }
    }

    /// Peeks at the current byte without consuming.
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos as usize).copied()
    }

    /// Peeks at the byte at offset from current position.
    #[inline]
    fn peek_at(&self, offset: u32) -> Option<u8> {
        self.bytes.get((self.pos + offset) as usize).copied()
    }

    /// Advances by one byte.
    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advances by n bytes.
    #[inline]
    fn advance_by(&mut self, n: u32) {
        self.pos += n;
    }

    /// Gets the slice from start to current position.
    #[inline]
    fn slice_from(&self, start: u32) -> &'a str {
        &self.source[start as usize..self.pos as usize]
    }

    /// Takes the message explaining the last `Error` token.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    fn fail(&mut self, message: impl Into<String>) -> TokenKind {
        self.error = Some(message.into());
        TokenKind::Error
    }

    /// Scans the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = match c {
            // Punctuation
            b'{' => self.punct(TokenKind::LBrace),
            b'}' => self.punct(TokenKind::RBrace),
            b'(' => self.punct(TokenKind::LParen),
            b')' => self.punct(TokenKind::RParen),
            b'[' => self.punct(TokenKind::LBracket),
            b']' => self.punct(TokenKind::RBracket),
            b':' => self.punct(TokenKind::Colon),
            b'=' => self.punct(TokenKind::Eq),
            b'|' => self.punct(TokenKind::Pipe),
            b'&' => self.punct(TokenKind::Amp),
            b'@' => self.punct(TokenKind::At),
            b'!' => self.punct(TokenKind::Bang),

            // String literals
            b'"' => self.scan_string(),

            // Numbers
            b'-' | b'0'..=b'9' => self.scan_number(),

            // Names and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_name(),

            _ => {
                let ch = self.source[start as usize..].chars().next().unwrap_or('?');
                self.advance_by(ch.len_utf8() as u32);
                self.fail(format!("unexpected character `{ch}`"))
            }
        };

        Token::new(kind, Span::new(start, self.pos))
    }

    #[inline]
    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace, commas, and comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | b',') => {
                    self.advance();
                }
                Some(b'#') => {
                    // Comment - skip to end of line
                    let rest = &self.bytes[self.pos as usize..];
                    match memchr::memchr2(b'\n', b'\r', rest) {
                        Some(len) => self.advance_by(len as u32),
                        None => self.pos = self.bytes.len() as u32,
                    }
                }
                Some(0xEF) if self.peek_at(1) == Some(0xBB) && self.peek_at(2) == Some(0xBF) => {
                    // UTF-8 BOM
                    self.advance_by(3);
                }
                _ => break,
            }
        }
    }

    /// Scans a name or keyword.
    fn scan_name(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.slice_from(start);

        TokenKind::from_keyword(text).unwrap_or(TokenKind::Name)
    }

    fn skip_digits(&mut self) -> u32 {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    /// Scans a number literal.
    fn scan_number(&mut self) -> TokenKind {
        let mut is_float = false;

        // Optional negative sign
        if self.peek() == Some(b'-') {
            self.advance();
        }

        // Integer part
        if self.peek() == Some(b'0') {
            self.advance();
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return self.fail("numbers must not have leading zeros");
            }
        } else if self.skip_digits() == 0 {
            return self.fail("expected digit");
        }

        // Fractional part
        if self.peek() == Some(b'.') {
            is_float = true;
            self.advance();
            if self.skip_digits() == 0 {
                return self.fail("expected digit after `.`");
            }
        }

        // Exponent part
        if let Some(b'e' | b'E') = self.peek() {
            is_float = true;
            self.advance();
            if let Some(b'+' | b'-') = self.peek() {
                self.advance();
            }
            if self.skip_digits() == 0 {
                return self.fail("expected digit in exponent");
            }
        }

        if self
            .peek()
            .is_some_and(|c| c == b'.' || c == b'_' || c.is_ascii_alphabetic())
        {
            return self.fail("invalid number");
        }

        if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // Opening quote

        // Check for block string
        if self.peek() == Some(b'"') && self.peek_at(1) == Some(b'"') {
            self.advance_by(2);
            return self.scan_block_string();
        }

        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return self.fail("unterminated string");
                }
                Some(b'"') => {
                    self.advance();
                    return TokenKind::StringLiteral;
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance(); // Escaped char
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scans a block string literal.
    fn scan_block_string(&mut self) -> TokenKind {
        loop {
            match self.peek() {
                None => {
                    return self.fail("unterminated block string");
                }
                Some(b'"') if self.peek_at(1) == Some(b'"') && self.peek_at(2) == Some(b'"') => {
                    self.advance_by(3);
                    return TokenKind::BlockStringLiteral;
                }
                Some(b'\\')
                    if self.peek_at(1) == Some(b'"')
                        && self.peek_at(2) == Some(b'"')
                        && self.peek_at(3) == Some(b'"') =>
                {
                    self.advance_by(4); // Escaped triple quote
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Gets the text at the given span.
    #[must_use]
    pub fn span_text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }
}

/// Tokenizes the entire source, stopping after the first error token.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error);
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{ } ( ) [ ] : = | & @ !"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::Eq,
                TokenKind::Pipe,
                TokenKind::Amp,
                TokenKind::At,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("type interface enum input scalar schema extend Query"),
            vec![
                TokenKind::Type,
                TokenKind::Interface,
                TokenKind::Enum,
                TokenKind::Input,
                TokenKind::Scalar,
                TokenKind::Schema,
                TokenKind::Extend,
                TokenKind::Name,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_commas_and_comments_are_trivia() {
        assert_eq!(
            kinds("a, b # trailing comment, with } tokens\n,c"),
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 -17 3.14 1e10 2.5e-3 0"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_numbers() {
        for source in ["007", "1.", "1e", "-x", "12abc"] {
            let tokens = tokenize(source);
            assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Error), "{source}");
        }
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#""hello" "wo\"rld" """block "quoted" string""""#),
            vec![
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::BlockStringLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc\ntype");
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert_eq!(lexer.take_error().as_deref(), Some("unterminated string"));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("type ✓");
        assert_eq!(lexer.next_token().kind, TokenKind::Type);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(token.span.len(), 3);
        assert_eq!(lexer.take_error().as_deref(), Some("unexpected character `✓`"));
    }
}
