//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use javelin_ir::{Span, Token, TokenKind, TokenList};

/// Cursor for navigating tokens.
///
/// Provides methods for accessing, consuming, and checking tokens during
/// parsing. Tracks current position in the token stream.
///
/// Includes a `tags` slice for fast O(1) discriminant checks without
/// touching the full `TokenKind`.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    /// Dense array of discriminant tags, parallel to `tokens`.
    tags: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens,
            tags: tokens.tags(),
            pos: 0,
        }
    }

    /// Get the total number of tokens in the stream.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Get the current position in the token stream.
    ///
    /// Compare positions before and after parsing to determine if tokens
    /// were consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used to roll back after lookahead scanning. The position must be
    /// within bounds of the token stream.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos < self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len() - 1
        );
        self.pos = pos;
    }

    /// Get the current token.
    ///
    /// Invariant: cursor position is always valid (`0..tokens.len()`).
    /// The last token is always EOF.
    #[inline]
    pub fn current(&self) -> &Token {
        debug_assert!(
            self.pos < self.tokens.len(),
            "cursor position out of bounds"
        );
        &self.tokens[self.pos]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the discriminant tag of the current token.
    #[inline]
    pub fn current_tag(&self) -> u8 {
        self.tags[self.pos]
    }

    /// Get the tag `lookahead` tokens ahead, or the EOF tag past the end.
    #[inline]
    pub fn peek_tag(&self, lookahead: usize) -> u8 {
        self.tag_at(self.pos + lookahead)
    }

    /// Get the tag at an absolute position, or the EOF tag past the end.
    #[inline]
    pub fn tag_at(&self, pos: usize) -> u8 {
        self.tags.get(pos).copied().unwrap_or(TokenKind::TAG_EOF)
    }

    /// Get the token at an absolute position, or the trailing EOF token.
    #[inline]
    pub fn token_at(&self, pos: usize) -> &Token {
        self.tokens
            .get(pos)
            .unwrap_or(&self.tokens[self.tokens.len() - 1])
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_tag() == TokenKind::TAG_EOF
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_tag() == kind.discriminant_index()
    }

    /// Check if the current token is an identifier.
    #[inline]
    pub fn check_ident(&self) -> bool {
        self.current_tag() == TokenKind::TAG_IDENT
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// The lexer always appends an EOF token and grammar rules check the
    /// current token kind before calling `advance()`, so the parser never
    /// advances past the last token.
    #[inline]
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Consume the current token if it matches, returning whether it did.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_ir::StringInterner;

    fn tokens_of(source: &str) -> TokenList {
        let interner = StringInterner::new();
        javelin_lexer::lex(source, &interner)
    }

    #[test]
    fn advance_stops_at_eof() {
        let tokens = tokens_of("a b");
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor.check_ident());
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn peek_past_end_is_eof() {
        let tokens = tokens_of("a");
        let cursor = Cursor::new(&tokens);

        assert_eq!(cursor.peek_tag(0), TokenKind::TAG_IDENT);
        assert_eq!(cursor.peek_tag(1), TokenKind::TAG_EOF);
        assert_eq!(cursor.peek_tag(99), TokenKind::TAG_EOF);
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let tokens = tokens_of("( )");
        let mut cursor = Cursor::new(&tokens);

        assert!(!cursor.eat(TokenKind::RParen));
        assert!(cursor.eat(TokenKind::LParen));
        assert!(cursor.eat(TokenKind::RParen));
    }
}
