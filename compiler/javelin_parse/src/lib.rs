//! Completion-aware recovery parser.
//!
//! Given a source buffer and the byte offset of the last character the user
//! typed, the parser reconstructs a partial compilation unit and synthesizes
//! at most one completion node marking what was being typed at the cursor.
//! Parsing never fails: malformed input degrades to a smaller skeleton plus
//! accumulated diagnostics.
//!
//! Two modes share one grammar:
//! - [`parse_diet`] builds declaration skeletons and skips every body. If
//!   the cursor falls inside a skipped body, the pass reports no completion.
//! - [`parse_full`] additionally expands the single body containing the
//!   cursor, recovering the statements around the completion point.
//!
//! # Architecture
//!
//! - `cursor`: token navigation over the lexed [`TokenList`]
//! - `recovery`: token sets and synchronization for error recovery
//! - `classify`: grammar-context to completion-kind mapping
//! - `completion`: completion-node construction and qualifier capture
//! - `grammar`: the rules themselves, split by construct family
//!
//! Grammar rules live in `impl Parser` blocks across the `grammar`
//! submodules so each family reads as its own unit while sharing the one
//! parser state.

mod classify;
mod completion;
mod cursor;
mod grammar;
mod recovery;

use cursor::Cursor;
use javelin_diagnostic::{Diagnostic, ErrorCode};
use javelin_ir::{
    render_completion, render_parent, render_unit, AstArena, CompletionId, Name, ParseUnit, Span,
    StringInterner, TokenKind, TokenList, NONE_SENTINEL,
};

/// How much of the unit to reconstruct.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ParseMode {
    /// Declaration skeletons only; all bodies skipped.
    Diet,
    /// Skeletons plus the one body containing the cursor.
    Full,
}

/// A parse error with code, message, and span.
///
/// Recovery parsing accumulates these instead of aborting; a completion
/// parse of in-progress source routinely produces several.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Optional context about what was being parsed.
    pub context: Option<String>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Attach context about the enclosing construct.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, self.code.description());
        if let Some(context) = &self.context {
            diagnostic = diagnostic.with_note(context.clone());
        }
        diagnostic
    }
}

/// The outcome of one recovery parse.
///
/// The four completion fields hold `<NONE>` when no completion node was
/// produced; `completion_identifier` and `replaced_source` may be empty
/// strings (not the sentinel) for zero-width triggers like a trailing `.`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseResult {
    /// Canonical display of the completion node (`<CompleteOnType:Z>`).
    pub completion_node: String,
    /// Display of the node's structural parent with the marker embedded.
    pub parent_node: String,
    /// The identifier fragment typed so far.
    pub completion_identifier: String,
    /// Exact source substring a completion would replace.
    pub replaced_source: String,
    /// Canonical display of the recovered unit skeleton.
    pub unit_display: String,
    /// Errors accumulated during recovery, in source order.
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn has_completion(&self) -> bool {
        self.completion_node != NONE_SENTINEL
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Diet parse: declaration skeletons only.
///
/// `cursor` is the byte offset of the last typed character. If it falls
/// inside a body, the body is still skipped and no completion is reported;
/// callers follow up with [`parse_full`].
pub fn parse_diet(source: &str, cursor: u32) -> ParseResult {
    parse_with_mode(source, cursor, ParseMode::Diet)
}

/// Full parse: skeletons plus the one body containing the cursor.
pub fn parse_full(source: &str, cursor: u32) -> ParseResult {
    parse_with_mode(source, cursor, ParseMode::Full)
}

fn parse_with_mode(source: &str, cursor: u32, mode: ParseMode) -> ParseResult {
    let interner = StringInterner::new();
    let tokens = javelin_lexer::lex(source, &interner);
    let offset = cursor.min(u32::try_from(source.len()).unwrap_or(u32::MAX));
    tracing::debug!(len = source.len(), offset, ?mode, "recovery parse");

    let mut parser = Parser::new(&tokens, &interner, source, offset, mode);
    let unit = parser.parse_unit();
    parser.finish(unit)
}

/// Recovery parser state.
///
/// Grammar rules are `impl Parser` methods in the `grammar` submodules;
/// completion synthesis lives in `completion`. The struct itself only
/// holds state and thin delegation over the token cursor.
struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: AstArena,
    interner: &'a StringInterner,
    source: &'a str,
    /// Byte offset of the last typed character, clamped to the source.
    offset: u32,
    mode: ParseMode,
    /// The single completion node, once triggered.
    completion: Option<CompletionId>,
    /// Diet mode: the cursor fell inside a skipped body.
    cursor_in_skipped_body: bool,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(
        tokens: &'a TokenList,
        interner: &'a StringInterner,
        source: &'a str,
        offset: u32,
        mode: ParseMode,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: AstArena::new(),
            interner,
            source,
            offset,
            mode,
            completion: None,
            cursor_in_skipped_body: false,
            errors: Vec::new(),
        }
    }

    fn finish(self, mut unit: ParseUnit) -> ParseResult {
        unit.completion = self.completion;
        unit.cursor_in_skipped_body = self.cursor_in_skipped_body;

        let unit_display = render_unit(&self.arena, self.interner, &unit);
        let (completion_node, parent_node, completion_identifier, replaced_source) =
            match self.completion {
                Some(id) => {
                    let node = self.arena.completion(id);
                    let replaced = self
                        .source
                        .get(node.replaced.start as usize..node.replaced.end as usize)
                        .unwrap_or("")
                        .to_string();
                    (
                        render_completion(&self.arena, self.interner, id),
                        render_parent(&self.arena, self.interner, id),
                        self.interner.lookup(node.fragment),
                        replaced,
                    )
                }
                None => (
                    NONE_SENTINEL.to_string(),
                    NONE_SENTINEL.to_string(),
                    NONE_SENTINEL.to_string(),
                    NONE_SENTINEL.to_string(),
                ),
            };

        ParseResult {
            completion_node,
            parent_node,
            completion_identifier,
            replaced_source,
            unit_display,
            errors: self.errors,
        }
    }

    // Cursor delegation.

    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    fn current_tag(&self) -> u8 {
        self.cursor.current_tag()
    }

    fn peek_tag(&self, lookahead: usize) -> u8 {
        self.cursor.peek_tag(lookahead)
    }

    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    fn check_ident(&self) -> bool {
        self.cursor.check_ident()
    }

    fn advance(&mut self) {
        self.cursor.advance();
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    /// Consume the current token and return its identifier name, or
    /// [`Name::EMPTY`] if it was not an identifier.
    fn take_ident(&mut self) -> Name {
        let name = match self.cursor.current_kind() {
            TokenKind::Ident(name) => name,
            _ => Name::EMPTY,
        };
        self.cursor.advance();
        name
    }

    /// Record a recoverable error and keep parsing.
    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.errors.push(ParseError::new(code, message, span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Offset of the last byte of `needle` within `source`.
    fn cursor_at(source: &str, needle: &str) -> u32 {
        let pos = match source.find(needle) {
            Some(pos) => pos,
            None => panic!("needle {needle:?} not found in source"),
        };
        u32::try_from(pos + needle.len() - 1).unwrap_or(u32::MAX)
    }

    #[test]
    fn type_fragment_in_field_declaration() {
        let source = "public class X {\n  public Y<Zon> var;\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(result.parent_node, "Y<<CompleteOnType:Zon>>");
        assert_eq!(result.completion_identifier, "Zon");
        assert_eq!(result.replaced_source, "Zon");
        assert_eq!(
            result.unit_display,
            "public class X {\n  public Y<<CompleteOnType:Zon>> var;\n}"
        );
    }

    #[test]
    fn parent_spans_all_qualified_segments() {
        let source = "public class X {\n  W<U>.Y<V, Zon> var;\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(result.parent_node, "W<U>.Y<V, <CompleteOnType:Zon>>");
        assert_eq!(
            result.unit_display,
            "public class X {\n  W<U>.Y<V, <CompleteOnType:Zon>> var;\n}"
        );
    }

    #[test]
    fn trailing_dot_renders_qualifier_inside_marker() {
        let source = "public class X {\n  Y<Zon>.\n}";
        let result = parse_diet(source, cursor_at(source, "."));

        assert_eq!(result.completion_node, "<CompleteOnType:Y<Zon>.>");
        assert_eq!(result.parent_node, NONE_SENTINEL);
        assert_eq!(result.completion_identifier, "");
        assert_eq!(result.replaced_source, "");
        assert_eq!(
            result.unit_display,
            "public class X {\n  <CompleteOnType:Y<Zon>.>;\n}"
        );
    }

    #[test]
    fn closing_angle_is_past_the_boundary() {
        let source = "public class X {\n  Y<Zon> var;\n}";
        let result = parse_diet(source, cursor_at(source, ">"));

        assert!(!result.has_completion());
        assert_eq!(result.completion_node, NONE_SENTINEL);
        assert_eq!(result.parent_node, NONE_SENTINEL);
        assert_eq!(result.completion_identifier, NONE_SENTINEL);
        assert_eq!(result.replaced_source, NONE_SENTINEL);
        assert_eq!(result.unit_display, "public class X {\n  Y<Zon> var;\n}");
    }

    #[test]
    fn lambda_in_initializer_never_completes() {
        let source = "class X {\n  I i2 = (y) -> {};\n}";
        let result = parse_diet(source, cursor_at(source, "y"));

        assert!(!result.has_completion());
        assert_eq!(result.unit_display, "class X {\n  I i2;\n}");
    }

    #[test]
    fn diet_skips_body_and_defers() {
        let source = "class X {\n  void m() {\n    zon\n  }\n}";
        let result = parse_diet(source, cursor_at(source, "zon"));

        assert!(!result.has_completion());
        assert_eq!(result.unit_display, "class X {\n  void m() {\n  }\n}");
    }

    #[test]
    fn full_expands_only_the_cursor_body() {
        let source = "class X {\n  void a() {\n    int i;\n  }\n  void b() {\n    zon\n  }\n}";
        let result = parse_full(source, cursor_at(source, "zon"));

        assert_eq!(result.completion_node, "<CompleteOnName:zon>");
        assert_eq!(result.completion_identifier, "zon");
        assert_eq!(result.replaced_source, "zon");
        assert_eq!(
            result.unit_display,
            "class X {\n  void a() {\n  }\n  void b() {\n    <CompleteOnName:zon>;\n  }\n}"
        );
    }

    #[test]
    fn explicit_ctor_call_survives_with_trailing_hole() {
        let source = "public class X {\n  X() {\n    <Y<Zon>.>super();\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(result.parent_node, "Y<<CompleteOnType:Zon>>");
        assert_eq!(
            result.unit_display,
            "public class X {\n  X() {\n    super();\n    Y<<CompleteOnType:Zon>>;\n  }\n}"
        );
    }

    #[test]
    fn cast_ambiguity_resolves_to_name() {
        let source = "class X {\n  void m() {\n    (Y<Zon>.) e;\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnName:Zon>");
        assert_eq!(result.parent_node, "Y<<CompleteOnName:Zon>>");
        assert_eq!(result.replaced_source, "Zon");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    Y<<CompleteOnName:Zon>>;\n  }\n}"
        );
    }

    #[test]
    fn qualified_explicit_ctor_behaves_like_plain() {
        let source = "public class X {\n  X() {\n    aaa.<Y<Zon>.>super();\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(
            result.unit_display,
            "public class X {\n  X() {\n    super();\n    Y<<CompleteOnType:Zon>>;\n  }\n}"
        );
    }

    #[test]
    fn this_qualified_explicit_ctor_behaves_like_plain() {
        let source = "public class X {\n  X() {\n    this.<Y<Zon>.>super();\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(result.parent_node, "Y<<CompleteOnType:Zon>>");
        assert_eq!(
            result.unit_display,
            "public class X {\n  X() {\n    super();\n    Y<<CompleteOnType:Zon>>;\n  }\n}"
        );
    }

    #[test]
    fn for_init_is_a_declaration_position() {
        let source = "class X {\n  void m() {\n    for (Zon x : xs) {\n    }\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    <CompleteOnType:Zon> x;\n  }\n}"
        );
    }

    #[test]
    fn type_parameter_bound_completes_as_type() {
        let source = "class X<T extends Zon> {\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(
            result.unit_display,
            "class X<T extends <CompleteOnType:Zon>> {\n}"
        );
    }

    #[test]
    fn nested_type_header_completes() {
        let source = "class X {\n  class Inner extends Zon {\n  }\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnClass:Zon>");
        assert_eq!(
            result.unit_display,
            "class X {\n  class Inner extends <CompleteOnClass:Zon> {\n  }\n}"
        );
    }

    #[test]
    fn allocation_type_never_completes() {
        let source = "class X {\n  void m() {\n    new Y<Zon\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert!(!result.has_completion());
        assert_eq!(result.completion_node, NONE_SENTINEL);
        assert_eq!(result.unit_display, "class X {\n  void m() {\n  }\n}");
    }

    #[test]
    fn allocation_arguments_complete() {
        let source = "class X {\n  void m() {\n    new Y(\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Y("));

        assert_eq!(
            result.completion_node,
            "<CompleteOnAllocationExpression:new Y()>"
        );
        assert_eq!(result.parent_node, NONE_SENTINEL);
        assert_eq!(result.completion_identifier, "");
        assert_eq!(result.replaced_source, "");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    <CompleteOnAllocationExpression:new Y()>;\n  }\n}"
        );
    }

    #[test]
    fn message_send_selector_completes() {
        let source = "class X {\n  void m() {\n    bar.fo(\n  }\n}";
        let result = parse_full(source, cursor_at(source, "fo"));

        assert_eq!(result.completion_node, "<CompleteOnMessageSendName:bar.fo>");
        assert_eq!(result.parent_node, NONE_SENTINEL);
        assert_eq!(result.completion_identifier, "fo");
        assert_eq!(result.replaced_source, "fo");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    <CompleteOnMessageSendName:bar.fo>;\n  }\n}"
        );
    }

    #[test]
    fn message_send_arguments_complete() {
        let source = "class X {\n  void m() {\n    bar.foo(arg\n  }\n}";
        let result = parse_full(source, cursor_at(source, "arg"));

        assert_eq!(result.completion_node, "<CompleteOnMessageSend:bar.foo()>");
        assert_eq!(result.completion_identifier, "");
        assert_eq!(result.replaced_source, "");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    <CompleteOnMessageSend:bar.foo()>;\n  }\n}"
        );
    }

    #[test]
    fn keyword_fragment_in_member_position() {
        let source = "public class X {\n  stat\n}";
        let result = parse_diet(source, cursor_at(source, "stat"));

        assert_eq!(result.completion_node, "<CompleteOnKeyword:stat>");
        assert_eq!(result.completion_identifier, "stat");
        assert_eq!(result.replaced_source, "stat");
        assert_eq!(
            result.unit_display,
            "public class X {\n  <CompleteOnKeyword:stat>;\n}"
        );
    }

    #[test]
    fn keyword_fragment_after_declaration_header() {
        let source = "public class X ext";
        let result = parse_diet(source, cursor_at(source, "ext"));

        assert_eq!(result.completion_node, "<CompleteOnKeyword:ext>");
        assert_eq!(result.unit_display, "public class X {\n}");
        assert!(result.has_errors());
    }

    #[test]
    fn superclass_position_completes_as_class() {
        let source = "public class X extends Zon {\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnClass:Zon>");
        assert_eq!(
            result.unit_display,
            "public class X extends <CompleteOnClass:Zon> {\n}"
        );
    }

    #[test]
    fn implements_position_completes_as_interface() {
        let source = "public class X implements Zon {\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnInterface:Zon>");
        assert_eq!(
            result.unit_display,
            "public class X implements <CompleteOnInterface:Zon> {\n}"
        );
    }

    #[test]
    fn throws_entry_completes_as_exception() {
        let source = "class X {\n  void m() throws Zon;\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnException:Zon>");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() throws <CompleteOnException:Zon>;\n}"
        );
    }

    #[test]
    fn catch_parameter_completes_as_exception() {
        let source = "class X {\n  void m() {\n    try {\n    } catch (Zon e) {\n    }\n  }\n}";
        let result = parse_full(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnException:Zon>");
        assert_eq!(
            result.unit_display,
            "class X {\n  void m() {\n    <CompleteOnException:Zon>;\n  }\n}"
        );
    }

    #[test]
    fn package_and_imports_are_consumed() {
        let source = "package a.b;\nimport c.d;\npublic class X {\n  Zon f;\n}";
        let result = parse_diet(source, cursor_at(source, "Zon"));

        assert_eq!(result.completion_node, "<CompleteOnType:Zon>");
        assert_eq!(
            result.unit_display,
            "public class X {\n  <CompleteOnType:Zon> f;\n}"
        );
    }

    #[test]
    fn truncated_source_accumulates_errors() {
        let source = "class X {";
        let result = parse_diet(source, 0);

        assert!(!result.has_completion());
        assert!(result.has_errors());
        assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1004));
        assert_eq!(result.unit_display, "class X {\n}");
    }

    #[test]
    fn parse_error_converts_to_diagnostic() {
        let error = ParseError::new(ErrorCode::E1004, "unclosed type body", Span::new(8, 9))
            .with_context("while parsing `X`");
        let diagnostic = error.to_diagnostic();

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.primary_span(), Some(Span::new(8, 9)));
        assert_eq!(diagnostic.notes, vec!["while parsing `X`".to_string()]);
    }

    proptest! {
        #[test]
        fn parsing_is_total_and_deterministic(
            source in "[ -~\\n]{0,120}",
            cursor in 0u32..200,
        ) {
            let diet = parse_diet(&source, cursor);
            let full = parse_full(&source, cursor);

            prop_assert_eq!(&diet, &parse_diet(&source, cursor));
            prop_assert_eq!(&full, &parse_full(&source, cursor));
        }

        #[test]
        fn sentinel_fields_agree(
            source in "[a-zA-Z0-9<>.,;(){} \\n]{0,120}",
            cursor in 0u32..200,
        ) {
            for result in [parse_diet(&source, cursor), parse_full(&source, cursor)] {
                if result.completion_node == NONE_SENTINEL {
                    prop_assert_eq!(&result.parent_node, NONE_SENTINEL);
                    prop_assert_eq!(&result.completion_identifier, NONE_SENTINEL);
                    prop_assert_eq!(&result.replaced_source, NONE_SENTINEL);
                }
            }
        }
    }
}
