//! Token types for the Javelin lexer.
//!
//! Tokens carry byte-exact spans so that completion nodes can report the
//! exact source substring a completion would replace.

use crate::{Name, Span};
use std::fmt;
use std::hash::Hash;

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for the Java-like grammar subset.
///
/// Identifiers use interned [`Name`] handles for O(1) equality.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Integer literal: 42, 0x1F
    Int(u64),
    /// String literal (interned, quotes stripped)
    String(Name),
    /// Char literal: 'a'
    CharLit(char),

    /// Identifier (interned)
    Ident(Name),

    // Declaration keywords
    Abstract,
    Class,
    Interface,
    Enum,
    Extends,
    Implements,
    Import,
    Package,
    Public,
    Private,
    Protected,
    Static,
    Final,

    // Statement keywords
    Throws,
    Throw,
    Try,
    Catch,
    Finally,
    New,
    Super,
    This,
    For,
    While,
    If,
    Else,
    Return,

    // Primitive type keywords
    Void,
    IntKw,
    BooleanKw,
    LongKw,
    ShortKw,
    ByteKw,
    CharKw,
    FloatKw,
    DoubleKw,

    // Punctuation
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Semicolon,  // ;
    Comma,      // ,
    Dot,        // .
    Ellipsis,   // ...
    At,         // @
    ColonColon, // ::
    Colon,      // :
    Arrow,      // ->

    // Operators
    Lt,       // <
    Gt,       // >
    Eq,       // =
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Amp,      // &
    Pipe,     // |
    Bang,     // !
    Question, // ?

    Eof,

    /// Generic error token for unrecognized input.
    Error,
}

impl TokenKind {
    pub const TAG_IDENT: u8 = 3;
    pub const TAG_EOF: u8 = 62;

    /// Compact discriminant index, stable across data-carrying variants.
    ///
    /// # Invariant
    /// All indices are < 128 so a token set fits in a `u128` bitset.
    #[inline]
    pub const fn discriminant_index(&self) -> u8 {
        match self {
            TokenKind::Int(_) => 0,
            TokenKind::String(_) => 1,
            TokenKind::CharLit(_) => 2,
            TokenKind::Ident(_) => Self::TAG_IDENT,

            TokenKind::Abstract => 4,
            TokenKind::Class => 5,
            TokenKind::Interface => 6,
            TokenKind::Enum => 7,
            TokenKind::Extends => 8,
            TokenKind::Implements => 9,
            TokenKind::Import => 10,
            TokenKind::Package => 11,
            TokenKind::Public => 12,
            TokenKind::Private => 13,
            TokenKind::Protected => 14,
            TokenKind::Static => 15,
            TokenKind::Final => 16,

            TokenKind::Throws => 17,
            TokenKind::Throw => 18,
            TokenKind::Try => 19,
            TokenKind::Catch => 20,
            TokenKind::Finally => 21,
            TokenKind::New => 22,
            TokenKind::Super => 23,
            TokenKind::This => 24,
            TokenKind::For => 25,
            TokenKind::While => 26,
            TokenKind::If => 27,
            TokenKind::Else => 28,
            TokenKind::Return => 29,

            TokenKind::Void => 30,
            TokenKind::IntKw => 31,
            TokenKind::BooleanKw => 32,
            TokenKind::LongKw => 33,
            TokenKind::ShortKw => 34,
            TokenKind::ByteKw => 35,
            TokenKind::CharKw => 36,
            TokenKind::FloatKw => 37,
            TokenKind::DoubleKw => 38,

            TokenKind::LParen => 39,
            TokenKind::RParen => 40,
            TokenKind::LBrace => 41,
            TokenKind::RBrace => 42,
            TokenKind::LBracket => 43,
            TokenKind::RBracket => 44,
            TokenKind::Semicolon => 45,
            TokenKind::Comma => 46,
            TokenKind::Dot => 47,
            TokenKind::Ellipsis => 48,
            TokenKind::At => 49,
            TokenKind::ColonColon => 50,
            TokenKind::Colon => 51,
            TokenKind::Arrow => 52,

            TokenKind::Lt => 53,
            TokenKind::Gt => 54,
            TokenKind::Eq => 55,
            TokenKind::Plus => 56,
            TokenKind::Minus => 57,
            TokenKind::Star => 58,
            TokenKind::Slash => 59,
            TokenKind::Amp => 60,
            TokenKind::Pipe => 61,

            TokenKind::Eof => Self::TAG_EOF,
            TokenKind::Bang => 63,
            TokenKind::Question => 64,
            TokenKind::Error => 65,
        }
    }

    /// Whether this is one of the primitive type keywords (including `void`).
    #[inline]
    pub const fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Void
                | TokenKind::IntKw
                | TokenKind::BooleanKw
                | TokenKind::LongKw
                | TokenKind::ShortKw
                | TokenKind::ByteKw
                | TokenKind::CharKw
                | TokenKind::FloatKw
                | TokenKind::DoubleKw
        )
    }

    /// Whether this is a declaration modifier keyword.
    #[inline]
    pub const fn is_modifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Static
                | TokenKind::Final
                | TokenKind::Abstract
        )
    }

    /// Human-readable name for error messages.
    pub const fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::String(_) => "string literal",
            TokenKind::CharLit(_) => "char literal",
            TokenKind::Ident(_) => "identifier",

            TokenKind::Abstract => "`abstract`",
            TokenKind::Class => "`class`",
            TokenKind::Interface => "`interface`",
            TokenKind::Enum => "`enum`",
            TokenKind::Extends => "`extends`",
            TokenKind::Implements => "`implements`",
            TokenKind::Import => "`import`",
            TokenKind::Package => "`package`",
            TokenKind::Public => "`public`",
            TokenKind::Private => "`private`",
            TokenKind::Protected => "`protected`",
            TokenKind::Static => "`static`",
            TokenKind::Final => "`final`",

            TokenKind::Throws => "`throws`",
            TokenKind::Throw => "`throw`",
            TokenKind::Try => "`try`",
            TokenKind::Catch => "`catch`",
            TokenKind::Finally => "`finally`",
            TokenKind::New => "`new`",
            TokenKind::Super => "`super`",
            TokenKind::This => "`this`",
            TokenKind::For => "`for`",
            TokenKind::While => "`while`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::Return => "`return`",

            TokenKind::Void => "`void`",
            TokenKind::IntKw => "`int`",
            TokenKind::BooleanKw => "`boolean`",
            TokenKind::LongKw => "`long`",
            TokenKind::ShortKw => "`short`",
            TokenKind::ByteKw => "`byte`",
            TokenKind::CharKw => "`char`",
            TokenKind::FloatKw => "`float`",
            TokenKind::DoubleKw => "`double`",

            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::At => "`@`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Colon => "`:`",
            TokenKind::Arrow => "`->`",

            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Eq => "`=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Amp => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Bang => "`!`",
            TokenKind::Question => "`?`",

            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }

    /// Source text of the keyword, if this is a keyword token.
    pub const fn keyword_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Abstract => Some("abstract"),
            TokenKind::Class => Some("class"),
            TokenKind::Interface => Some("interface"),
            TokenKind::Enum => Some("enum"),
            TokenKind::Extends => Some("extends"),
            TokenKind::Implements => Some("implements"),
            TokenKind::Import => Some("import"),
            TokenKind::Package => Some("package"),
            TokenKind::Public => Some("public"),
            TokenKind::Private => Some("private"),
            TokenKind::Protected => Some("protected"),
            TokenKind::Static => Some("static"),
            TokenKind::Final => Some("final"),
            TokenKind::Throws => Some("throws"),
            TokenKind::Throw => Some("throw"),
            TokenKind::Try => Some("try"),
            TokenKind::Catch => Some("catch"),
            TokenKind::Finally => Some("finally"),
            TokenKind::New => Some("new"),
            TokenKind::Super => Some("super"),
            TokenKind::This => Some("this"),
            TokenKind::For => Some("for"),
            TokenKind::While => Some("while"),
            TokenKind::If => Some("if"),
            TokenKind::Else => Some("else"),
            TokenKind::Return => Some("return"),
            TokenKind::Void => Some("void"),
            TokenKind::IntKw => Some("int"),
            TokenKind::BooleanKw => Some("boolean"),
            TokenKind::LongKw => Some("long"),
            TokenKind::ShortKw => Some("short"),
            TokenKind::ByteKw => Some("byte"),
            TokenKind::CharKw => Some("char"),
            TokenKind::FloatKw => Some("float"),
            TokenKind::DoubleKw => Some("double"),
            _ => None,
        }
    }
}

/// A list of tokens with a parallel discriminant-tag array.
///
/// The tag array enables O(1) kind checks with a single byte load instead of
/// touching the full token.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
    /// `tags[i] == tokens[i].kind.discriminant_index()` for all `i`.
    tags: Vec<u8>,
}

impl TokenList {
    /// Create a new empty token list.
    #[inline]
    pub fn new() -> Self {
        TokenList {
            tokens: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Create a new token list with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
            tags: Vec::with_capacity(capacity),
        }
    }

    /// Append a token, keeping the tag array in sync.
    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tags.push(token.kind.discriminant_index());
        self.tokens.push(token);
    }

    /// Number of tokens (including the trailing EOF).
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the list is empty (a lexed list never is; it ends in EOF).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The parallel tag array.
    #[inline]
    pub fn tags(&self) -> &[u8] {
        &self.tags
    }

    /// Token at an index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_are_unique_and_small() {
        let kinds = [
            TokenKind::Int(0),
            TokenKind::String(Name::EMPTY),
            TokenKind::CharLit('a'),
            TokenKind::Ident(Name::EMPTY),
            TokenKind::Abstract,
            TokenKind::Class,
            TokenKind::Interface,
            TokenKind::Enum,
            TokenKind::Extends,
            TokenKind::Implements,
            TokenKind::Import,
            TokenKind::Package,
            TokenKind::Public,
            TokenKind::Private,
            TokenKind::Protected,
            TokenKind::Static,
            TokenKind::Final,
            TokenKind::Throws,
            TokenKind::Throw,
            TokenKind::Try,
            TokenKind::Catch,
            TokenKind::Finally,
            TokenKind::New,
            TokenKind::Super,
            TokenKind::This,
            TokenKind::For,
            TokenKind::While,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Return,
            TokenKind::Void,
            TokenKind::IntKw,
            TokenKind::BooleanKw,
            TokenKind::LongKw,
            TokenKind::ShortKw,
            TokenKind::ByteKw,
            TokenKind::CharKw,
            TokenKind::FloatKw,
            TokenKind::DoubleKw,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Ellipsis,
            TokenKind::At,
            TokenKind::ColonColon,
            TokenKind::Colon,
            TokenKind::Arrow,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Amp,
            TokenKind::Pipe,
            TokenKind::Bang,
            TokenKind::Question,
            TokenKind::Eof,
            TokenKind::Error,
        ];

        let mut seen = [false; 128];
        for kind in &kinds {
            let index = kind.discriminant_index() as usize;
            assert!(index < 128, "index {index} out of bitset range");
            assert!(!seen[index], "duplicate discriminant {index} for {kind:?}");
            seen[index] = true;
        }
    }

    #[test]
    fn data_variants_share_discriminant() {
        assert_eq!(
            TokenKind::Int(1).discriminant_index(),
            TokenKind::Int(999).discriminant_index()
        );
        assert_eq!(
            TokenKind::Ident(Name::EMPTY).discriminant_index(),
            TokenKind::TAG_IDENT
        );
        assert_eq!(TokenKind::Eof.discriminant_index(), TokenKind::TAG_EOF);
    }

    #[test]
    fn token_list_keeps_tags_in_sync() {
        let mut list = TokenList::new();
        list.push(Token::new(TokenKind::Class, Span::new(0, 5)));
        list.push(Token::new(TokenKind::Ident(Name::EMPTY), Span::new(6, 7)));
        list.push(Token::new(TokenKind::Eof, Span::point(7)));

        assert_eq!(list.len(), 3);
        assert_eq!(list.tags()[0], TokenKind::Class.discriminant_index());
        assert_eq!(list.tags()[1], TokenKind::TAG_IDENT);
        assert_eq!(list.tags()[2], TokenKind::TAG_EOF);
        assert_eq!(list[1].span, Span::new(6, 7));
    }
}
