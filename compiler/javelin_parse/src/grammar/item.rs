//! Declaration-level parsing.
//!
//! Diet parsing reconstructs declaration skeletons: type declarations with
//! their header clauses, fields, methods, constructors, initializer blocks
//! and nested types. Method bodies are skipped as balanced-brace spans; in
//! full mode the one body containing the cursor is expanded instead.

use crate::classify::GrammarContext;
use crate::recovery::{synchronize, MEMBER_BOUNDARY, UNIT_BOUNDARY};
use crate::{ParseMode, Parser};
use javelin_diagnostic::ErrorCode;
use javelin_ir::{
    FieldDecl, Member, MethodBody, MethodDecl, Modifier, Name, ParamDecl, ParseUnit, TokenKind,
    TypeDecl, TypeDeclKind, TypeParam, TypeSlot,
};

impl Parser<'_> {
    /// Parse a compilation unit: optional `package`/`import` headers
    /// (consumed, not rendered) followed by type declarations.
    pub(crate) fn parse_unit(&mut self) -> ParseUnit {
        let mut unit = ParseUnit::default();

        if self.check(TokenKind::Package) {
            self.skip_to_semicolon();
            self.eat(TokenKind::Semicolon);
        }
        while self.check(TokenKind::Import) {
            self.skip_to_semicolon();
            self.eat(TokenKind::Semicolon);
        }

        while !self.is_at_end() {
            if self.check_ident() && self.at_completion(self.current_span()) {
                // Partially typed keyword at unit level (`cla`).
                let span = self.current_span();
                let fragment = self.fragment_of(span);
                self.trigger(GrammarContext::KeywordPosition, fragment, None, span);
                self.advance();
                continue;
            }
            if self.check(TokenKind::Error) {
                self.error(ErrorCode::E0001, "invalid character", self.current_span());
                self.advance();
                continue;
            }
            match self.parse_type_decl() {
                Some(decl) => unit.types.push(decl),
                None => {
                    if self.is_at_end() {
                        break;
                    }
                    tracing::trace!(span = ?self.current_span(), "skipping to next declaration");
                    self.advance();
                    synchronize(&mut self.cursor, UNIT_BOUNDARY);
                }
            }
        }

        unit
    }

    fn parse_type_decl(&mut self) -> Option<TypeDecl> {
        let modifiers = self.parse_modifiers();
        self.parse_type_decl_tail(modifiers)
    }

    /// Parse a type declaration whose modifiers have already been consumed.
    fn parse_type_decl_tail(&mut self, modifiers: Vec<Modifier>) -> Option<TypeDecl> {
        let kind = match self.current_kind() {
            TokenKind::Class => TypeDeclKind::Class,
            TokenKind::Interface => TypeDeclKind::Interface,
            TokenKind::Enum => TypeDeclKind::Enum,
            other => {
                self.error(
                    ErrorCode::E1001,
                    format!("expected type declaration, found {}", other.display_name()),
                    self.current_span(),
                );
                return None;
            }
        };
        self.advance();

        let name = if self.check_ident() {
            self.take_ident()
        } else {
            self.error(
                ErrorCode::E1006,
                "missing declaration name",
                self.current_span(),
            );
            Name::EMPTY
        };

        let type_params = if self.check(TokenKind::Lt) {
            self.parse_type_params()
        } else {
            Vec::new()
        };

        // Partially typed `extends`/`implements` in the header slot.
        if self.check_ident() {
            let span = self.current_span();
            if self.at_completion(span) {
                let fragment = self.fragment_of(span);
                self.trigger(GrammarContext::KeywordPosition, fragment, None, span);
            } else {
                self.error(
                    ErrorCode::E1001,
                    "unexpected identifier in declaration header",
                    span,
                );
            }
            self.advance();
        }

        let mut superclass = None;
        let mut interfaces = Vec::new();
        if self.eat(TokenKind::Extends) {
            match kind {
                TypeDeclKind::Interface => {
                    self.parse_type_list(GrammarContext::Interface, &mut interfaces);
                }
                TypeDeclKind::Class | TypeDeclKind::Enum => {
                    superclass = self.parse_type_slot(GrammarContext::Superclass);
                    if superclass.is_none() {
                        self.error(
                            ErrorCode::E1003,
                            "expected superclass reference",
                            self.current_span(),
                        );
                    }
                }
            }
        }
        if self.eat(TokenKind::Implements) {
            self.parse_type_list(GrammarContext::Interface, &mut interfaces);
        }

        let mut members = Vec::new();
        if self.eat(TokenKind::LBrace) {
            loop {
                while self.eat(TokenKind::Semicolon) {}
                if self.eat(TokenKind::RBrace) {
                    break;
                }
                if self.is_at_end() {
                    self.error(ErrorCode::E1004, "unclosed type body", self.current_span());
                    break;
                }
                match self.parse_member() {
                    Some(member) => members.push(member),
                    None => {
                        tracing::trace!(span = ?self.current_span(), "dropping unrecognized member");
                        self.advance();
                        synchronize(&mut self.cursor, MEMBER_BOUNDARY);
                        self.eat(TokenKind::Semicolon);
                    }
                }
            }
        } else {
            self.error(
                ErrorCode::E1004,
                "expected `{` to open type body",
                self.current_span(),
            );
        }

        Some(TypeDecl {
            modifiers,
            kind,
            name,
            type_params,
            superclass,
            interfaces,
            members,
        })
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.current_kind() {
                TokenKind::Public => Modifier::Public,
                TokenKind::Private => Modifier::Private,
                TokenKind::Protected => Modifier::Protected,
                TokenKind::Static => Modifier::Static,
                TokenKind::Final => Modifier::Final,
                TokenKind::Abstract => Modifier::Abstract,
                _ => break,
            };
            modifiers.push(modifier);
            self.advance();
        }
        modifiers
    }

    /// Parse a comma-separated list of type references into `out`.
    fn parse_type_list(&mut self, ctx: GrammarContext, out: &mut Vec<TypeSlot>) {
        loop {
            match self.parse_type_slot(ctx) {
                Some(slot) => out.push(slot),
                None => break,
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    /// Parse a type parameter list, cursor at `<`.
    pub(crate) fn parse_type_params(&mut self) -> Vec<TypeParam> {
        self.advance();
        let mut params = Vec::new();
        loop {
            if self.eat(TokenKind::Gt) {
                break;
            }
            if !self.check_ident() {
                self.error(
                    ErrorCode::E1005,
                    "unterminated type parameter list",
                    self.current_span(),
                );
                while !self.is_at_end()
                    && !self.check(TokenKind::Gt)
                    && !MEMBER_BOUNDARY.contains_tag(self.current_tag())
                {
                    self.advance();
                }
                self.eat(TokenKind::Gt);
                break;
            }
            let name = self.take_ident();
            let mut bounds = Vec::new();
            if self.eat(TokenKind::Extends) {
                loop {
                    match self.parse_type_slot(GrammarContext::TypeParameterBound) {
                        Some(slot) => bounds.push(slot),
                        None => break,
                    }
                    if !self.eat(TokenKind::Amp) {
                        break;
                    }
                }
            }
            params.push(TypeParam { name, bounds });
            self.eat(TokenKind::Comma);
        }
        params
    }

    fn parse_member(&mut self) -> Option<Member> {
        let modifiers = self.parse_modifiers();

        // Initializer block.
        if self.check(TokenKind::LBrace) {
            let body = self.parse_body_or_skip();
            return Some(Member::Initializer {
                is_static: modifiers.contains(&Modifier::Static),
                body,
            });
        }

        // Nested type.
        if matches!(
            self.current_kind(),
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum
        ) {
            return self.parse_type_decl_tail(modifiers).map(Member::Nested);
        }

        // Method type parameters.
        let type_params = if self.check(TokenKind::Lt) {
            self.parse_type_params()
        } else {
            Vec::new()
        };

        // Partially typed keyword at member start (`pub`, `voi`): the next
        // token does not continue a type reference or a constructor.
        if self.check_ident() && self.at_completion(self.current_span()) {
            let next = self.peek_tag(1);
            let continues_type = next == TokenKind::TAG_IDENT
                || next == TokenKind::Lt.discriminant_index()
                || next == TokenKind::Dot.discriminant_index()
                || next == TokenKind::LParen.discriminant_index();
            if !continues_type {
                let span = self.current_span();
                let fragment = self.fragment_of(span);
                let id = self.trigger(GrammarContext::KeywordPosition, fragment, None, span);
                self.advance();
                self.eat(TokenKind::Semicolon);
                return Some(Member::Dangling(TypeSlot::Hole(id)));
            }
        }

        // Constructor: `Name (`.
        if self.check_ident() && self.peek_tag(1) == TokenKind::LParen.discriminant_index() {
            let name = self.take_ident();
            return Some(Member::Method(
                self.parse_method_tail(modifiers, type_params, None, name),
            ));
        }

        // `void` can only open a method declaration.
        let ty_ctx = if self.check(TokenKind::Void) {
            GrammarContext::ReturnType
        } else {
            GrammarContext::FieldType
        };
        let ty = match self.parse_type_slot(ty_ctx) {
            Some(ty) => ty,
            None => {
                if !modifiers.is_empty() || !type_params.is_empty() {
                    self.error(
                        ErrorCode::E1008,
                        "expected member declaration",
                        self.current_span(),
                    );
                }
                return None;
            }
        };

        if !self.check_ident() {
            // `Y<Z>.` or a completion hole with nothing after it: keep the
            // reference as a dangling member.
            self.eat(TokenKind::Semicolon);
            return Some(Member::Dangling(ty));
        }
        let name = self.take_ident();

        if self.check(TokenKind::LParen) {
            return Some(Member::Method(
                self.parse_method_tail(modifiers, type_params, Some(ty), name),
            ));
        }

        // Field; initializer and extra declarators are dropped.
        if self.check(TokenKind::Eq) || self.check(TokenKind::Comma) {
            self.skip_to_semicolon();
        }
        self.eat(TokenKind::Semicolon);
        Some(Member::Field(FieldDecl {
            modifiers,
            ty,
            name,
        }))
    }

    /// Parse a method or constructor from its parameter list on, cursor at
    /// `(`.
    fn parse_method_tail(
        &mut self,
        modifiers: Vec<Modifier>,
        type_params: Vec<TypeParam>,
        return_ty: Option<TypeSlot>,
        name: Name,
    ) -> MethodDecl {
        self.advance();
        let mut params = Vec::new();
        loop {
            if self.eat(TokenKind::RParen) {
                break;
            }
            if self.is_at_end()
                || self.check(TokenKind::LBrace)
                || self.check(TokenKind::Semicolon)
                || self.check(TokenKind::RBrace)
            {
                self.error(
                    ErrorCode::E1004,
                    "unclosed parameter list",
                    self.current_span(),
                );
                break;
            }
            let _ = self.parse_modifiers();
            match self.parse_type_slot(GrammarContext::ParameterType) {
                Some(ty) => {
                    self.eat(TokenKind::Ellipsis);
                    let param_name = if self.check_ident() {
                        self.take_ident()
                    } else {
                        Name::EMPTY
                    };
                    params.push(ParamDecl {
                        ty,
                        name: param_name,
                    });
                }
                None => {
                    self.advance();
                    continue;
                }
            }
            self.eat(TokenKind::Comma);
        }

        let mut throws = Vec::new();
        if self.eat(TokenKind::Throws) {
            loop {
                match self.parse_type_slot(GrammarContext::Throws) {
                    Some(slot) => throws.push(slot),
                    None => break,
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let body = if self.eat(TokenKind::Semicolon) {
            MethodBody::Absent
        } else if self.check(TokenKind::LBrace) {
            self.parse_body_or_skip()
        } else {
            self.error(
                ErrorCode::E1001,
                "expected method body or `;`",
                self.current_span(),
            );
            MethodBody::Absent
        };

        MethodDecl {
            modifiers,
            type_params,
            return_ty,
            name,
            params,
            throws,
            body,
        }
    }

    /// Handle a body, cursor at `{`.
    ///
    /// Diet mode always skips the balanced-brace span; if the cursor falls
    /// strictly inside it, that fact is recorded and this pass reports no
    /// completion. Full mode expands the one body containing the cursor.
    pub(crate) fn parse_body_or_skip(&mut self) -> MethodBody {
        let open_span = self.current_span();
        let open_pos = self.cursor.position();
        let inner_end = match self.scan_matching_brace(open_pos) {
            Some(close_pos) => self.cursor.token_at(close_pos).span.start,
            None => u32::MAX,
        };
        let contains_cursor = self.offset >= open_span.end && self.offset < inner_end;

        if contains_cursor && self.mode == ParseMode::Full {
            self.advance();
            let stmts = self.parse_block_stmts();
            return MethodBody::Recovered(stmts);
        }
        if contains_cursor {
            self.cursor_in_skipped_body = true;
        }

        self.advance();
        let mut depth = 1usize;
        while depth > 0 && !self.is_at_end() {
            if self.check(TokenKind::LBrace) {
                depth += 1;
            } else if self.check(TokenKind::RBrace) {
                depth -= 1;
            }
            self.advance();
        }
        if depth > 0 {
            self.error(ErrorCode::E1007, "source ends inside an unclosed body", open_span);
        }
        MethodBody::Stub
    }

    /// Find the position of the `}` matching the `{` at `open_pos` without
    /// consuming tokens.
    pub(crate) fn scan_matching_brace(&self, open_pos: usize) -> Option<usize> {
        let lbrace = TokenKind::LBrace.discriminant_index();
        let rbrace = TokenKind::RBrace.discriminant_index();
        let mut depth = 0usize;
        let mut pos = open_pos;
        while pos < self.cursor.token_count() {
            let tag = self.cursor.tag_at(pos);
            if tag == lbrace {
                depth += 1;
            } else if tag == rbrace {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            } else if tag == TokenKind::TAG_EOF {
                return None;
            }
            pos += 1;
        }
        None
    }

    /// Find the position of the `)` matching the `(` at `open_pos` without
    /// consuming tokens.
    pub(crate) fn scan_matching_paren(&self, open_pos: usize) -> Option<usize> {
        let lparen = TokenKind::LParen.discriminant_index();
        let rparen = TokenKind::RParen.discriminant_index();
        let mut depth = 0usize;
        let mut pos = open_pos;
        while pos < self.cursor.token_count() {
            let tag = self.cursor.tag_at(pos);
            if tag == lparen {
                depth += 1;
            } else if tag == rparen {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            } else if tag == TokenKind::TAG_EOF {
                return None;
            }
            pos += 1;
        }
        None
    }

    /// Skip a balanced delimiter group, cursor at the opening token. Does
    /// nothing if the current token is not `open`.
    pub(crate) fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        if !self.check(open) {
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            if self.check(open) {
                depth += 1;
            } else if self.check(close) {
                depth -= 1;
                self.advance();
                if depth == 0 {
                    return;
                }
                continue;
            }
            self.advance();
        }
    }

    /// Skip forward to the next `;` at nesting depth zero, without
    /// consuming it. Stops before an enclosing `}`.
    pub(crate) fn skip_to_semicolon(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => return,
                _ => {}
            }
            self.advance();
        }
    }
}
