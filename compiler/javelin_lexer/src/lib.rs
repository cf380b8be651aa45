//! Lexer for the Java-like completion grammar using logos with string
//! interning.
//!
//! Produces a `TokenList` with byte-exact spans; the parser locates the
//! cursor token by span containment, so spans must cover exactly the typed
//! characters. Comments and whitespace are dropped, and the list always ends
//! in an `Eof` token at the end-of-source offset.

use javelin_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    #[token("abstract")]
    Abstract,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("package")]
    Package,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("static")]
    Static,
    #[token("final")]
    Final,

    #[token("throws")]
    Throws,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("new")]
    New,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,

    #[token("void")]
    Void,
    #[token("int")]
    IntKw,
    #[token("boolean")]
    BooleanKw,
    #[token("long")]
    LongKw,
    #[token("short")]
    ShortKw,
    #[token("byte")]
    ByteKw,
    #[token("char")]
    CharKw,
    #[token("float")]
    FloatKw,
    #[token("double")]
    DoubleKw,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,

    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,

    // Hex integer
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| {
        let s = lex.slice();
        u64::from_str_radix(&s[2..].replace('_', ""), 16).ok()
    })]
    HexInt(u64),

    // Decimal integer (optional long suffix, dropped)
    #[regex(r"[0-9][0-9_]*[lL]?", |lex| {
        lex.slice().trim_end_matches(['l', 'L']).replace('_', "").parse::<u64>().ok()
    })]
    Int(u64),

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    // Char literal
    #[regex(r"'([^'\\\n\r]|\\.)'")]
    Char,

    // Identifier ($ is legal in Java identifiers)
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Lex source code into a `TokenList`.
///
/// Never fails: unrecognized input becomes `Error` tokens and the parser
/// recovers past them.
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    let mut result = TokenList::with_capacity(source.len() / 4 + 1);
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(raw) => {
                let kind = convert_token(raw, slice, interner);
                result.push(Token::new(kind, span));
            }
            Err(()) => {
                result.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    let eof_pos = u32::try_from(source.len()).unwrap_or(u32::MAX);
    result.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    result
}

/// Convert a raw token to a `TokenKind`, interning identifiers and strings.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        // Literals
        RawToken::Int(n) | RawToken::HexInt(n) => TokenKind::Int(n),
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::String(interner.intern(&unescape_string(content)))
        }
        RawToken::Char => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::CharLit(unescape_char(content))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        // Keywords
        RawToken::Abstract => TokenKind::Abstract,
        RawToken::Class => TokenKind::Class,
        RawToken::Interface => TokenKind::Interface,
        RawToken::Enum => TokenKind::Enum,
        RawToken::Extends => TokenKind::Extends,
        RawToken::Implements => TokenKind::Implements,
        RawToken::Import => TokenKind::Import,
        RawToken::Package => TokenKind::Package,
        RawToken::Public => TokenKind::Public,
        RawToken::Private => TokenKind::Private,
        RawToken::Protected => TokenKind::Protected,
        RawToken::Static => TokenKind::Static,
        RawToken::Final => TokenKind::Final,
        RawToken::Throws => TokenKind::Throws,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Finally => TokenKind::Finally,
        RawToken::New => TokenKind::New,
        RawToken::Super => TokenKind::Super,
        RawToken::This => TokenKind::This,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Return => TokenKind::Return,

        // Primitive type keywords
        RawToken::Void => TokenKind::Void,
        RawToken::IntKw => TokenKind::IntKw,
        RawToken::BooleanKw => TokenKind::BooleanKw,
        RawToken::LongKw => TokenKind::LongKw,
        RawToken::ShortKw => TokenKind::ShortKw,
        RawToken::ByteKw => TokenKind::ByteKw,
        RawToken::CharKw => TokenKind::CharKw,
        RawToken::FloatKw => TokenKind::FloatKw,
        RawToken::DoubleKw => TokenKind::DoubleKw,

        // Punctuation
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Dot => TokenKind::Dot,
        RawToken::At => TokenKind::At,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,

        // Operators
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Question => TokenKind::Question,

        // Trivia is filtered before conversion
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Error,
    }
}

/// Process string escape sequences.
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') | None => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('0') => result.push('\0'),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Process char escape sequences.
fn unescape_char(s: &str) -> char {
    let mut chars = s.chars();
    match chars.next() {
        Some('\\') => match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') | None => '\\',
            Some('\'') => '\'',
            Some('0') => '\0',
            Some(c) => c,
        },
        Some(c) => c,
        None => '\0',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn lex_class_header() {
        let interner = StringInterner::new();
        let tokens = lex("public class X extends Y<Z> {", &interner);

        assert!(matches!(tokens[0].kind, TokenKind::Public));
        assert!(matches!(tokens[1].kind, TokenKind::Class));
        assert!(matches!(tokens[2].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[3].kind, TokenKind::Extends));
        assert!(matches!(tokens[4].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[5].kind, TokenKind::Lt));
        assert!(matches!(tokens[6].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[7].kind, TokenKind::Gt));
        assert!(matches!(tokens[8].kind, TokenKind::LBrace));
        assert!(matches!(tokens[9].kind, TokenKind::Eof));
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn spans_cover_exact_source_bytes() {
        let interner = StringInterner::new();
        let source = "Y<Zon";
        let tokens = lex(source, &interner);

        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(1, 2));
        assert_eq!(tokens[2].span, Span::new(2, 5));
        assert_eq!(tokens[2].span.text(source), "Zon");
        assert_eq!(tokens[3].span, Span::point(5));
    }

    #[test]
    fn keywords_beat_identifiers() {
        let interner = StringInterner::new();
        let tokens = lex("classx class", &interner);

        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[1].kind, TokenKind::Class));
    }

    #[test]
    fn comments_and_whitespace_are_dropped() {
        let interner = StringInterner::new();
        let tokens = lex("a // comment\n/* block\n */ b", &interner);

        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[1].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[2].kind, TokenKind::Eof));
    }

    #[test]
    fn string_and_char_literals() {
        let interner = StringInterner::new();
        let tokens = lex(r#""he\"llo" 'x' '\n'"#, &interner);

        if let TokenKind::String(name) = tokens[0].kind {
            assert_eq!(interner.lookup(name), "he\"llo");
        } else {
            panic!("expected string token, got {:?}", tokens[0]);
        }
        assert!(matches!(tokens[1].kind, TokenKind::CharLit('x')));
        assert!(matches!(tokens[2].kind, TokenKind::CharLit('\n')));
    }

    #[test]
    fn integer_forms() {
        let interner = StringInterner::new();
        let tokens = lex("42 0x1F 1_000 7L", &interner);

        assert!(matches!(tokens[0].kind, TokenKind::Int(42)));
        assert!(matches!(tokens[1].kind, TokenKind::Int(31)));
        assert!(matches!(tokens[2].kind, TokenKind::Int(1000)));
        assert!(matches!(tokens[3].kind, TokenKind::Int(7)));
    }

    #[test]
    fn multi_char_punctuation() {
        let interner = StringInterner::new();
        let tokens = lex("... :: -> .", &interner);

        assert!(matches!(tokens[0].kind, TokenKind::Ellipsis));
        assert!(matches!(tokens[1].kind, TokenKind::ColonColon));
        assert!(matches!(tokens[2].kind, TokenKind::Arrow));
        assert!(matches!(tokens[3].kind, TokenKind::Dot));
    }

    #[test]
    fn unterminated_garbage_becomes_error_tokens() {
        let interner = StringInterner::new();
        let tokens = lex("a # b", &interner);

        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[1].kind, TokenKind::Error));
        assert!(matches!(tokens[2].kind, TokenKind::Ident(_)));
    }

    #[test]
    fn empty_source_is_just_eof() {
        let interner = StringInterner::new();
        let tokens = lex("", &interner);

        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
        assert_eq!(tokens[0].span, Span::point(0));
    }

    proptest! {
        #[test]
        fn never_panics_and_always_ends_in_eof(source in "\\PC*") {
            let interner = StringInterner::new();
            let tokens = lex(&source, &interner);
            prop_assert!(tokens.len() >= 1);
            prop_assert!(matches!(tokens[tokens.len() - 1].kind, TokenKind::Eof));
        }

        #[test]
        fn spans_are_ordered_and_in_bounds(source in "[a-zA-Z0-9<>.,;(){} ]{0,64}") {
            let interner = StringInterner::new();
            let tokens = lex(&source, &interner);
            let mut prev_end = 0u32;
            for i in 0..tokens.len() {
                let span = tokens[i].span;
                prop_assert!(span.start >= prev_end);
                prop_assert!(span.end as usize <= source.len());
                prev_end = span.end;
            }
        }
    }
}
