//! Statement recovery inside an expanded body.
//!
//! Full mode expands exactly one body, and only to the extent needed to
//! place the completion node: control structure is flattened, expression
//! statements without the cursor are dropped, and the survivors are
//! explicit constructor calls, local declaration skeletons, and the one
//! dangling reference carrying the hole.

use crate::classify::GrammarContext;
use crate::recovery::{synchronize, STMT_BOUNDARY};
use crate::Parser;
use javelin_diagnostic::ErrorCode;
use javelin_ir::{Name, Span, Stmt, TokenKind, TypeSegment, TypeSlot};

impl Parser<'_> {
    /// Parse statements up to the matching `}`, cursor just past the `{`.
    pub(crate) fn parse_block_stmts(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            if self.eat(TokenKind::RBrace) {
                break;
            }
            if self.is_at_end() {
                self.error(ErrorCode::E1004, "unclosed block", self.current_span());
                break;
            }
            self.parse_stmt(&mut stmts);
        }
        stmts
    }

    fn parse_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        match self.current_kind() {
            TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::LBrace => {
                self.advance();
                let inner = self.parse_block_stmts();
                stmts.extend(inner);
            }
            TokenKind::Super => {
                self.parse_explicit_ctor(stmts, Vec::new());
            }
            TokenKind::Lt => {
                let pending = self.parse_explicit_ctor_type_args();
                self.parse_explicit_ctor(stmts, pending);
            }
            TokenKind::This => {
                self.advance();
                if self.eat(TokenKind::Dot) && self.check(TokenKind::Lt) {
                    let pending = self.parse_explicit_ctor_type_args();
                    self.parse_explicit_ctor(stmts, pending);
                } else {
                    self.skip_to_semicolon();
                    self.eat(TokenKind::Semicolon);
                }
            }
            TokenKind::New => {
                self.parse_allocation_stmt(stmts);
            }
            TokenKind::Throw => {
                self.advance();
                if self.check(TokenKind::New) {
                    self.parse_allocation_stmt(stmts);
                } else if self.check_ident() {
                    self.parse_ident_led_stmt(stmts);
                } else {
                    self.skip_to_semicolon();
                    self.eat(TokenKind::Semicolon);
                }
            }
            TokenKind::Try => {
                self.parse_try_stmt(stmts);
            }
            TokenKind::For => {
                self.parse_for_stmt(stmts);
            }
            TokenKind::If | TokenKind::While => {
                self.advance();
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
            TokenKind::Else => {
                self.advance();
            }
            TokenKind::Return => {
                self.advance();
                if self.check_ident() {
                    self.parse_ident_led_stmt(stmts);
                } else if self.check(TokenKind::New) {
                    self.parse_allocation_stmt(stmts);
                } else {
                    self.skip_to_semicolon();
                    self.eat(TokenKind::Semicolon);
                }
            }
            TokenKind::LParen => {
                self.parse_paren_led_stmt(stmts);
            }
            TokenKind::Ident(_) => {
                self.parse_ident_led_stmt(stmts);
            }
            kind if kind.is_primitive_type() => {
                self.parse_local_decl(stmts, GrammarContext::LocalType);
            }
            other => {
                self.error(
                    ErrorCode::E1009,
                    format!("expected statement, found {}", other.display_name()),
                    self.current_span(),
                );
                self.advance();
                synchronize(&mut self.cursor, STMT_BOUNDARY);
                self.eat(TokenKind::Semicolon);
            }
        }
    }

    /// Dispatch a statement beginning with an identifier by scanning the
    /// `ident (. ident)*` run ahead of the cursor position.
    fn parse_ident_led_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        let dot = TokenKind::Dot.discriminant_index();
        let lt = TokenKind::Lt.discriminant_index();
        let lparen = TokenKind::LParen.discriminant_index();

        let start = self.cursor.position();
        let mut last_ident = start;
        loop {
            if self.cursor.tag_at(last_ident + 1) != dot {
                break;
            }
            let after_dot = self.cursor.tag_at(last_ident + 2);
            if after_dot == TokenKind::TAG_IDENT {
                last_ident += 2;
                continue;
            }
            if after_dot == lt {
                // `name.<T>super(...)` — qualified explicit constructor
                // call; the qualifier expression is discarded.
                while self.cursor.position() < last_ident + 2 {
                    self.advance();
                }
                let pending = self.parse_explicit_ctor_type_args();
                self.parse_explicit_ctor(stmts, pending);
                return;
            }
            break;
        }

        let after_run = self.cursor.tag_at(last_ident + 1);
        if after_run == lparen {
            self.parse_message_send(stmts, last_ident);
        } else if after_run == lt || after_run == TokenKind::TAG_IDENT {
            self.parse_local_decl(stmts, GrammarContext::LocalType);
        } else {
            self.parse_name_expr(stmts);
        }
    }

    /// A bare name expression (`zon;`, `a.b = c;`). Only interesting when
    /// the cursor sits on the name.
    fn parse_name_expr(&mut self, stmts: &mut Vec<Stmt>) {
        let slot = self.parse_type_slot(GrammarContext::ExpressionName);
        self.skip_to_semicolon();
        self.eat(TokenKind::Semicolon);
        if let Some(slot) = slot {
            if self.slot_has_hole(slot) {
                stmts.push(Stmt::Dangling(slot));
            }
        }
    }

    /// Local variable declaration skeleton, initializer dropped.
    fn parse_local_decl(&mut self, stmts: &mut Vec<Stmt>, ctx: GrammarContext) {
        let slot = match self.parse_type_slot(ctx) {
            Some(slot) => slot,
            None => {
                self.advance();
                return;
            }
        };
        let name = if self.check_ident() {
            Some(self.take_ident())
        } else {
            None
        };
        if self.check(TokenKind::Eq) || self.check(TokenKind::Comma) {
            self.skip_to_semicolon();
        }
        self.eat(TokenKind::Semicolon);

        match name {
            Some(name) => stmts.push(Stmt::LocalDecl {
                ty: slot,
                name: Some(name),
            }),
            None if self.slot_has_hole(slot) => stmts.push(Stmt::Dangling(slot)),
            None => {}
        }
    }

    /// Message send: the receiver run has been scanned but not consumed;
    /// `last_ident` is the selector position and a `(` follows it.
    fn parse_message_send(&mut self, stmts: &mut Vec<Stmt>, last_ident: usize) {
        let mut segments: Vec<TypeSegment> = Vec::new();

        while self.cursor.position() < last_ident {
            let name_span = self.current_span();
            if self.at_completion(name_span) {
                let fragment = self.fragment_of(name_span);
                let qualifier = self.qualifier_from(&segments);
                let id = self.trigger(GrammarContext::ExpressionName, fragment, qualifier, name_span);
                self.finish_send_stmt(stmts, TypeSlot::Hole(id));
                return;
            }
            let name = self.take_ident();
            segments.push(TypeSegment::simple(name, name_span));

            let dot_span = self.current_span();
            self.advance();
            if self.at_completion(dot_span) {
                let qualifier = self.qualifier_from(&segments);
                let id = self.trigger(
                    GrammarContext::ExpressionName,
                    Name::EMPTY,
                    qualifier,
                    Span::point(dot_span.end),
                );
                self.finish_send_stmt(stmts, TypeSlot::Hole(id));
                return;
            }
        }

        // Selector.
        let sel_span = self.current_span();
        if self.at_completion(sel_span) {
            let fragment = self.fragment_of(sel_span);
            let receiver = self.receiver_from(segments);
            let id = self.trigger(
                GrammarContext::MessageSendSelector,
                fragment,
                receiver,
                sel_span,
            );
            self.finish_send_stmt(stmts, TypeSlot::Hole(id));
            return;
        }
        let selector = self.take_ident();

        // Argument list.
        if self.check(TokenKind::LParen) {
            let lparen_span = self.current_span();
            let inner_end = match self.scan_matching_paren(self.cursor.position()) {
                Some(close_pos) => self.cursor.token_at(close_pos).span.start,
                None => u32::MAX,
            };
            if self.completion.is_none()
                && self.offset >= lparen_span.start
                && self.offset < inner_end
            {
                let receiver = self.receiver_from(segments);
                let id = self.trigger_send(receiver, selector, Span::point(lparen_span.end));
                self.finish_send_stmt(stmts, TypeSlot::Hole(id));
                return;
            }
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        }
        self.skip_to_semicolon();
        self.eat(TokenKind::Semicolon);
    }

    /// Consume the remainder of a send whose completion node was just
    /// produced and record the hole as a trailing statement.
    fn finish_send_stmt(&mut self, stmts: &mut Vec<Stmt>, slot: TypeSlot) {
        self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        self.skip_to_semicolon();
        self.eat(TokenKind::Semicolon);
        stmts.push(Stmt::Dangling(slot));
    }

    /// `(`-led statement: a lambda parameter list (never a completion
    /// site) or a parenthesized name with cast ambiguity, resolved as a
    /// name expression.
    fn parse_paren_led_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        let open_pos = self.cursor.position();
        if let Some(close_pos) = self.scan_matching_paren(open_pos) {
            if self.cursor.tag_at(close_pos + 1) == TokenKind::Arrow.discriminant_index() {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                self.advance();
                if self.check(TokenKind::LBrace) {
                    self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                } else {
                    self.skip_to_semicolon();
                }
                self.eat(TokenKind::Semicolon);
                return;
            }
        }

        self.advance();
        let slot = if self.check_ident() {
            self.parse_type_slot(GrammarContext::ExpressionName)
        } else {
            None
        };
        while !self.check(TokenKind::RParen)
            && !self.check(TokenKind::Semicolon)
            && !self.check(TokenKind::RBrace)
            && !self.is_at_end()
        {
            self.advance();
        }
        self.eat(TokenKind::RParen);
        self.skip_to_semicolon();
        self.eat(TokenKind::Semicolon);
        if let Some(slot) = slot {
            if self.slot_has_hole(slot) {
                stmts.push(Stmt::Dangling(slot));
            }
        }
    }

    /// Explicit constructor type arguments, cursor at `<`. Returns the
    /// arguments that embed the completion hole; the rest are discarded.
    fn parse_explicit_ctor_type_args(&mut self) -> Vec<TypeSlot> {
        let open_span = self.current_span();
        self.advance();
        let mut pending = Vec::new();
        loop {
            if self.eat(TokenKind::Gt) {
                break;
            }
            if STMT_BOUNDARY.contains_tag(self.current_tag()) || self.is_at_end() {
                self.error(
                    ErrorCode::E1005,
                    "unterminated type argument list",
                    open_span,
                );
                break;
            }
            match self.parse_type_slot(GrammarContext::ExplicitCtorTypeArgument) {
                Some(slot) => {
                    if self.slot_has_hole(slot) {
                        pending.push(slot);
                    }
                }
                None => {
                    self.advance();
                }
            }
            self.eat(TokenKind::Comma);
        }
        pending
    }

    /// `super(...)` with any pending holed type arguments rendered as
    /// trailing statements after the call.
    fn parse_explicit_ctor(&mut self, stmts: &mut Vec<Stmt>, pending: Vec<TypeSlot>) {
        if self.eat(TokenKind::Super) {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            self.skip_to_semicolon();
            self.eat(TokenKind::Semicolon);
            stmts.push(Stmt::SuperCall);
        } else {
            self.error(
                ErrorCode::E1001,
                format!("expected `super`, found {}", self.current_kind().display_name()),
                self.current_span(),
            );
            self.skip_to_semicolon();
            self.eat(TokenKind::Semicolon);
        }
        for slot in pending {
            stmts.push(Stmt::Dangling(slot));
        }
    }

    /// `new T(...)`, cursor at `new`. The allocated type itself never
    /// triggers; the argument list does.
    fn parse_allocation_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        self.advance();
        let ty = self.parse_type_slot(GrammarContext::AllocationType);

        if self.check(TokenKind::LParen) {
            let lparen_span = self.current_span();
            let inner_end = match self.scan_matching_paren(self.cursor.position()) {
                Some(close_pos) => self.cursor.token_at(close_pos).span.start,
                None => u32::MAX,
            };
            if self.completion.is_none()
                && self.offset >= lparen_span.start
                && self.offset < inner_end
            {
                let ty_ref = match ty {
                    Some(TypeSlot::Ref(id)) => Some(id),
                    _ => None,
                };
                let id = self.trigger(
                    GrammarContext::AllocationArgument,
                    Name::EMPTY,
                    ty_ref,
                    Span::point(lparen_span.end),
                );
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                self.skip_to_semicolon();
                self.eat(TokenKind::Semicolon);
                stmts.push(Stmt::Dangling(TypeSlot::Hole(id)));
                return;
            }
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        }
        // Anonymous class body.
        self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
        self.skip_to_semicolon();
        self.eat(TokenKind::Semicolon);
    }

    /// `try { ... } catch (E e) { ... } finally { ... }`, flattened.
    fn parse_try_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        self.advance();
        if self.eat(TokenKind::LBrace) {
            let inner = self.parse_block_stmts();
            stmts.extend(inner);
        }
        while self.eat(TokenKind::Catch) {
            self.eat(TokenKind::LParen);
            if let Some(slot) = self.parse_type_slot(GrammarContext::CatchParameter) {
                if self.check_ident() {
                    self.advance();
                }
                if self.slot_has_hole(slot) {
                    stmts.push(Stmt::Dangling(slot));
                }
            }
            while !self.check(TokenKind::RParen)
                && !self.check(TokenKind::LBrace)
                && !self.is_at_end()
            {
                self.advance();
            }
            self.eat(TokenKind::RParen);
            if self.eat(TokenKind::LBrace) {
                let inner = self.parse_block_stmts();
                stmts.extend(inner);
            }
        }
        if self.eat(TokenKind::Finally) && self.eat(TokenKind::LBrace) {
            let inner = self.parse_block_stmts();
            stmts.extend(inner);
        }
    }

    /// `for (T x : xs)` / `for (T x = ...; ...)` — only a declaration in
    /// the header survives; the body is handled by the statement loop.
    fn parse_for_stmt(&mut self, stmts: &mut Vec<Stmt>) {
        self.advance();
        if !self.check(TokenKind::LParen) {
            return;
        }
        let open_pos = self.cursor.position();
        let close_pos = self.scan_matching_paren(open_pos);
        self.advance();

        let lt = TokenKind::Lt.discriminant_index();
        let dot = TokenKind::Dot.discriminant_index();
        let starts_decl = self.current_kind().is_primitive_type()
            || (self.check_ident()
                && matches!(self.peek_tag(1), t if t == TokenKind::TAG_IDENT || t == lt || t == dot));
        if starts_decl {
            if let Some(slot) = self.parse_type_slot(GrammarContext::ForInitType) {
                let name = if self.check_ident() {
                    Some(self.take_ident())
                } else {
                    None
                };
                match name {
                    Some(name) => stmts.push(Stmt::LocalDecl {
                        ty: slot,
                        name: Some(name),
                    }),
                    None if self.slot_has_hole(slot) => stmts.push(Stmt::Dangling(slot)),
                    None => {}
                }
            }
        }

        // Skip the rest of the header.
        match close_pos {
            Some(close_pos) => self.cursor.set_position(close_pos + 1),
            None => {
                self.error(ErrorCode::E1004, "unclosed `for` header", self.current_span());
                synchronize(&mut self.cursor, STMT_BOUNDARY);
            }
        }
    }
}
