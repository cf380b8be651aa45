//! Type reference parsing.
//!
//! A type reference is a dot-separated chain of segments, each optionally
//! carrying a generic argument list (`W<U>.Y<V, Z>`). The parse is driven by
//! an explicit per-segment state machine so that in-progress references
//! (`Y<Z`, `Y<Z>.`) leave well-defined partial structure behind: everything
//! consumed before the cursor token survives and is rendered verbatim.

use crate::classify::GrammarContext;
use crate::recovery::TYPE_ARG_FOLLOW;
use crate::Parser;
use javelin_diagnostic::ErrorCode;
use javelin_ir::{CompletionId, Name, Span, TokenKind, TypeRef, TypeSegment, TypeSlot};

/// State of the argument-list scan within one segment.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum RefState {
    /// Consumed the opening `<`; an argument is expected.
    SawLess,
    /// Consumed a complete type argument; `,` or `>` is expected.
    SawTypeArg,
    /// Consumed a `,` separator; the next argument is expected.
    SawComma,
}

impl Parser<'_> {
    /// Parse a type reference in `ctx`.
    ///
    /// Returns `None` when no type starts at the current token. Otherwise
    /// the slot is either a real reference (possibly embedding the
    /// completion hole in an argument position, with the hole's structural
    /// parent set to the returned reference) or the hole itself when the
    /// cursor sat on a segment name or trailing delimiter.
    pub(crate) fn parse_type_slot(&mut self, ctx: GrammarContext) -> Option<TypeSlot> {
        if self.current_kind().is_primitive_type() {
            let kind = self.current_kind();
            let span = self.current_span();
            self.advance();
            let name = self.interner.intern(kind.keyword_text().unwrap_or(""));
            let id = self.arena.alloc_type_ref(TypeRef {
                segments: vec![TypeSegment::simple(name, span)],
                trailing_dot: false,
            });
            return Some(TypeSlot::Ref(id));
        }

        if !self.check_ident() {
            return None;
        }

        let mut segments: Vec<TypeSegment> = Vec::new();
        // Completion hole sitting directly in this reference's argument
        // lists; its structural parent is this reference.
        let mut own_hole: Option<CompletionId> = None;

        loop {
            debug_assert!(self.check_ident());
            let name_span = self.current_span();
            let name = self.take_ident();

            if name_span.contains(self.offset)
                && self.completion.is_none()
                && !ctx.suppresses_completion()
            {
                let fragment = self.fragment_of(name_span);
                let qualifier = self.qualifier_from(&segments);
                let id = self.trigger(ctx, fragment, qualifier, name_span);
                self.skip_residual_type_args();
                return Some(TypeSlot::Hole(id));
            }

            let mut segment = TypeSegment::simple(name, name_span);

            if self.check(TokenKind::Lt) {
                let lt_span = self.current_span();
                self.advance();
                segment.has_args = true;
                let mut state = RefState::SawLess;

                if self.at_completion(lt_span) && !ctx.suppresses_completion() {
                    let id = self.trigger(
                        ctx.nested(),
                        Name::EMPTY,
                        None,
                        Span::point(lt_span.end),
                    );
                    segment.args.push(TypeSlot::Hole(id));
                    own_hole = Some(id);
                    state = RefState::SawTypeArg;
                }

                loop {
                    if self.check(TokenKind::Gt) {
                        self.advance();
                        break;
                    }
                    if TYPE_ARG_FOLLOW.contains_tag(self.current_tag()) {
                        // The list is still open at a boundary; leave it
                        // unterminated and let the caller continue.
                        self.error(
                            ErrorCode::E1005,
                            "unterminated type argument list",
                            lt_span,
                        );
                        break;
                    }
                    match state {
                        RefState::SawTypeArg => {
                            if self.check(TokenKind::Comma) {
                                let comma_span = self.current_span();
                                self.advance();
                                state = RefState::SawComma;
                                if self.at_completion(comma_span)
                                    && !ctx.suppresses_completion()
                                {
                                    let id = self.trigger(
                                        ctx.nested(),
                                        Name::EMPTY,
                                        None,
                                        Span::point(comma_span.end),
                                    );
                                    segment.args.push(TypeSlot::Hole(id));
                                    own_hole = Some(id);
                                    state = RefState::SawTypeArg;
                                }
                            } else {
                                self.error(
                                    ErrorCode::E1001,
                                    format!(
                                        "expected `,` or `>`, found {}",
                                        self.current_kind().display_name()
                                    ),
                                    self.current_span(),
                                );
                                self.advance();
                            }
                        }
                        _ => match self.parse_type_slot(ctx.nested()) {
                            Some(slot) => {
                                if let TypeSlot::Hole(id) = slot {
                                    if self.arena.completion(id).parent.is_none() {
                                        own_hole = Some(id);
                                    }
                                }
                                segment.args.push(slot);
                                state = RefState::SawTypeArg;
                            }
                            None => {
                                self.error(
                                    ErrorCode::E1003,
                                    "expected type argument",
                                    self.current_span(),
                                );
                                self.advance();
                            }
                        },
                    }
                }
            }

            segments.push(segment);

            if self.check(TokenKind::Dot) {
                let dot_span = self.current_span();
                self.advance();

                if self.at_completion(dot_span) && !ctx.suppresses_completion() {
                    let qualifier = self.qualifier_from(&segments);
                    let id =
                        self.trigger(ctx, Name::EMPTY, qualifier, Span::point(dot_span.end));
                    return Some(TypeSlot::Hole(id));
                }
                if self.check_ident() {
                    continue;
                }
                // Dangling `Y<Z>.` with the cursor elsewhere: keep the
                // reference, report the gap.
                self.error(ErrorCode::E1002, "expected identifier after `.`", dot_span);
            }
            break;
        }

        let id = self.arena.alloc_type_ref(TypeRef {
            segments,
            trailing_dot: false,
        });
        if let Some(hole) = own_hole {
            self.arena.set_completion_parent(hole, id);
        }
        Some(TypeSlot::Ref(id))
    }

    /// Consume a residual `<...>` group left after the completion token
    /// (`Y<Z> var` with the cursor on `Y`). The group is discarded; it lies
    /// entirely after the cursor.
    fn skip_residual_type_args(&mut self) {
        if !self.check(TokenKind::Lt) {
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            if self.check(TokenKind::Lt) {
                depth += 1;
                self.advance();
                continue;
            }
            if self.check(TokenKind::Gt) {
                self.advance();
                depth -= 1;
                if depth == 0 {
                    return;
                }
                continue;
            }
            if TYPE_ARG_FOLLOW.contains_tag(self.current_tag()) {
                return;
            }
            self.advance();
        }
    }
}
