//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after
//! errors. Uses bitset-based O(1) membership testing.

use crate::cursor::Cursor;
use javelin_ir::TokenKind;

/// A set of token kinds using bitset representation for O(1) membership
/// testing.
///
/// Each bit in the `u128` corresponds to a `TokenKind` discriminant index;
/// all discriminants fit in 128 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a token kind to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.discriminant_index()))
    }

    /// Check if this set contains a token kind.
    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u128 << kind.discriminant_index())) != 0
    }

    /// Check if this set contains a discriminant tag.
    #[inline]
    pub const fn contains_tag(&self, tag: u8) -> bool {
        (self.0 & (1u128 << tag)) != 0
    }
}

// Pre-defined token sets for common recovery scenarios, computed at compile
// time with the const builder.

/// Recovery set for top-level declaration boundaries.
pub const UNIT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Class)
    .with(TokenKind::Interface)
    .with(TokenKind::Enum)
    .with(TokenKind::Public)
    .with(TokenKind::Private)
    .with(TokenKind::Protected)
    .with(TokenKind::Abstract)
    .with(TokenKind::Static)
    .with(TokenKind::Final)
    .with(TokenKind::Eof);

/// Recovery set for member boundaries inside a type body.
pub const MEMBER_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::LBrace)
    .with(TokenKind::RBrace)
    .with(TokenKind::Eof);

/// Recovery set for statement boundaries inside a recovered body.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::RBrace)
    .with(TokenKind::Eof);

/// Tokens that terminate an unclosed type argument list.
pub const TYPE_ARG_FOLLOW: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::LBrace)
    .with(TokenKind::RBrace)
    .with(TokenKind::RParen)
    .with(TokenKind::LParen)
    .with(TokenKind::Eq)
    .with(TokenKind::Eof);

/// Advance the cursor until reaching a token in the recovery set or EOF.
///
/// Returns `true` if a recovery token was found, `false` if EOF was reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains_tag(cursor.current_tag()) {
            return true;
        }
        cursor.advance();
    }
    recovery.contains(&TokenKind::Eof)
}
