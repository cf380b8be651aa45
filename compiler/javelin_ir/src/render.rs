//! Canonical display rendering for recovered units.
//!
//! The renderer is a deterministic, side-effect-free formatter producing the
//! comparison strings asserted by the test harness: the completion-node
//! marker, the structural parent display, and the unit skeleton.

use crate::ast::{
    CompletionId, CompletionKind, Member, MethodBody, MethodDecl, ParseUnit, Stmt, TypeDecl,
    TypeParam, TypeRefId, TypeSlot,
};
use crate::{AstArena, NONE_SENTINEL, StringInterner};
use std::fmt::Write;

/// Render the `<CompleteOn...>` marker for a completion node.
pub fn render_completion(arena: &AstArena, interner: &StringInterner, id: CompletionId) -> String {
    let node = arena.completion(id);
    let fragment = interner.lookup(node.fragment);

    match node.kind {
        CompletionKind::OnMessageSend => {
            let mut out = String::from("<CompleteOnMessageSend:");
            if let Some(receiver) = node.qualifier {
                render_type_ref(arena, interner, receiver, &mut out);
                out.push('.');
            }
            if let Some(selector) = node.selector {
                out.push_str(&interner.lookup(selector));
            }
            out.push_str("()>");
            out
        }
        CompletionKind::OnMessageSendName => {
            let mut out = String::from("<CompleteOnMessageSendName:");
            if let Some(receiver) = node.qualifier {
                render_type_ref(arena, interner, receiver, &mut out);
                out.push('.');
            }
            out.push_str(&fragment);
            out.push('>');
            out
        }
        CompletionKind::OnAllocationExpression => {
            let mut out = String::from("<CompleteOnAllocationExpression:new ");
            if let Some(ty) = node.qualifier {
                render_type_ref(arena, interner, ty, &mut out);
            }
            out.push_str("()>");
            out
        }
        _ => {
            let mut out = String::new();
            let _ = write!(out, "<CompleteOn{}:", node.kind.marker_label());
            if let Some(qualifier) = node.qualifier {
                render_type_ref(arena, interner, qualifier, &mut out);
            }
            out.push_str(&fragment);
            out.push('>');
            out
        }
    }
}

/// Render the structural parent of a completion node, with the marker
/// embedded at the hole, or `<NONE>` if the node has no parent.
pub fn render_parent(arena: &AstArena, interner: &StringInterner, id: CompletionId) -> String {
    match arena.completion(id).parent {
        Some(parent) => {
            let mut out = String::new();
            render_type_ref(arena, interner, parent, &mut out);
            out
        }
        None => NONE_SENTINEL.to_string(),
    }
}

/// Render the recovered unit skeleton.
pub fn render_unit(arena: &AstArena, interner: &StringInterner, unit: &ParseUnit) -> String {
    let mut out = String::new();
    for (i, decl) in unit.types.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_type_decl(arena, interner, decl, 0, &mut out);
    }
    out
}

fn render_type_ref(arena: &AstArena, interner: &StringInterner, id: TypeRefId, out: &mut String) {
    let type_ref = arena.type_ref(id);
    for (i, segment) in type_ref.segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&interner.lookup(segment.name));
        if segment.has_args {
            out.push('<');
            for (j, arg) in segment.args.iter().enumerate() {
                if j > 0 {
                    out.push_str(", ");
                }
                render_slot(arena, interner, *arg, out);
            }
            out.push('>');
        }
    }
    if type_ref.trailing_dot {
        out.push('.');
    }
}

fn render_slot(arena: &AstArena, interner: &StringInterner, slot: TypeSlot, out: &mut String) {
    match slot {
        TypeSlot::Ref(id) => render_type_ref(arena, interner, id, out),
        TypeSlot::Hole(id) => out.push_str(&render_completion(arena, interner, id)),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_modifiers(modifiers: &[crate::ast::Modifier], out: &mut String) {
    for modifier in modifiers {
        out.push_str(modifier.as_str());
        out.push(' ');
    }
}

fn render_type_params(
    arena: &AstArena,
    interner: &StringInterner,
    params: &[TypeParam],
    out: &mut String,
) {
    if params.is_empty() {
        return;
    }
    out.push('<');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&interner.lookup(param.name));
        if !param.bounds.is_empty() {
            out.push_str(" extends ");
            for (j, bound) in param.bounds.iter().enumerate() {
                if j > 0 {
                    out.push_str(" & ");
                }
                render_slot(arena, interner, *bound, out);
            }
        }
    }
    out.push('>');
}

fn render_type_decl(
    arena: &AstArena,
    interner: &StringInterner,
    decl: &TypeDecl,
    depth: usize,
    out: &mut String,
) {
    push_indent(out, depth);
    render_modifiers(&decl.modifiers, out);
    out.push_str(decl.kind.keyword());
    out.push(' ');
    out.push_str(&interner.lookup(decl.name));
    render_type_params(arena, interner, &decl.type_params, out);
    if let Some(superclass) = decl.superclass {
        out.push_str(" extends ");
        render_slot(arena, interner, superclass, out);
    }
    if !decl.interfaces.is_empty() {
        out.push_str(match decl.kind {
            crate::ast::TypeDeclKind::Interface => " extends ",
            _ => " implements ",
        });
        for (i, interface) in decl.interfaces.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_slot(arena, interner, *interface, out);
        }
    }
    out.push_str(" {\n");
    for member in &decl.members {
        render_member(arena, interner, member, depth + 1, out);
    }
    push_indent(out, depth);
    out.push('}');
    if depth > 0 {
        out.push('\n');
    }
}

fn render_member(
    arena: &AstArena,
    interner: &StringInterner,
    member: &Member,
    depth: usize,
    out: &mut String,
) {
    match member {
        Member::Field(field) => {
            push_indent(out, depth);
            render_modifiers(&field.modifiers, out);
            render_slot(arena, interner, field.ty, out);
            out.push(' ');
            out.push_str(&interner.lookup(field.name));
            out.push_str(";\n");
        }
        Member::Method(method) => render_method(arena, interner, method, depth, out),
        Member::Nested(decl) => render_type_decl(arena, interner, decl, depth, out),
        Member::Initializer { is_static, body } => {
            push_indent(out, depth);
            if *is_static {
                out.push_str("static ");
            }
            out.push_str("{\n");
            if let MethodBody::Recovered(stmts) = body {
                for stmt in stmts {
                    render_stmt(arena, interner, stmt, depth + 1, out);
                }
            }
            push_indent(out, depth);
            out.push_str("}\n");
        }
        Member::Dangling(slot) => {
            push_indent(out, depth);
            render_slot(arena, interner, *slot, out);
            out.push_str(";\n");
        }
    }
}

fn render_method(
    arena: &AstArena,
    interner: &StringInterner,
    method: &MethodDecl,
    depth: usize,
    out: &mut String,
) {
    push_indent(out, depth);
    render_modifiers(&method.modifiers, out);
    if !method.type_params.is_empty() {
        render_type_params(arena, interner, &method.type_params, out);
        out.push(' ');
    }
    if let Some(return_ty) = method.return_ty {
        render_slot(arena, interner, return_ty, out);
        out.push(' ');
    }
    out.push_str(&interner.lookup(method.name));
    out.push('(');
    for (i, param) in method.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render_slot(arena, interner, param.ty, out);
        let param_name = interner.lookup(param.name);
        if !param_name.is_empty() {
            out.push(' ');
            out.push_str(&param_name);
        }
    }
    out.push(')');
    if !method.throws.is_empty() {
        out.push_str(" throws ");
        for (i, thrown) in method.throws.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_slot(arena, interner, *thrown, out);
        }
    }
    match &method.body {
        MethodBody::Absent => out.push_str(";\n"),
        MethodBody::Stub => {
            out.push_str(" {\n");
            push_indent(out, depth);
            out.push_str("}\n");
        }
        MethodBody::Recovered(stmts) => {
            out.push_str(" {\n");
            for stmt in stmts {
                render_stmt(arena, interner, stmt, depth + 1, out);
            }
            push_indent(out, depth);
            out.push_str("}\n");
        }
    }
}

fn render_stmt(
    arena: &AstArena,
    interner: &StringInterner,
    stmt: &Stmt,
    depth: usize,
    out: &mut String,
) {
    push_indent(out, depth);
    match stmt {
        Stmt::SuperCall => out.push_str("super();"),
        Stmt::LocalDecl { ty, name } => {
            render_slot(arena, interner, *ty, out);
            if let Some(name) = name {
                out.push(' ');
                out.push_str(&interner.lookup(*name));
            }
            out.push(';');
        }
        Stmt::Dangling(slot) => {
            render_slot(arena, interner, *slot, out);
            out.push(';');
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompletionNode, TypeRef, TypeSegment};
    use crate::{Name, Span};
    use pretty_assertions::assert_eq;

    fn simple_ref(arena: &mut AstArena, interner: &StringInterner, name: &str) -> TypeRefId {
        arena.alloc_type_ref(TypeRef {
            segments: vec![TypeSegment::simple(interner.intern(name), Span::DUMMY)],
            trailing_dot: false,
        })
    }

    #[test]
    fn completion_marker_with_fragment() {
        let mut arena = AstArena::new();
        let interner = StringInterner::new();
        let id = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnType,
            fragment: interner.intern("Z"),
            qualifier: None,
            selector: None,
            replaced: Span::DUMMY,
            parent: None,
        });
        assert_eq!(render_completion(&arena, &interner, id), "<CompleteOnType:Z>");
        assert_eq!(render_parent(&arena, &interner, id), NONE_SENTINEL);
    }

    #[test]
    fn parent_embeds_marker_inside_argument_list() {
        let mut arena = AstArena::new();
        let interner = StringInterner::new();
        let hole = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnType,
            fragment: interner.intern("Z"),
            qualifier: None,
            selector: None,
            replaced: Span::DUMMY,
            parent: None,
        });
        let parent = arena.alloc_type_ref(TypeRef {
            segments: vec![TypeSegment {
                name: interner.intern("Y"),
                span: Span::DUMMY,
                args: vec![TypeSlot::Hole(hole)],
                has_args: true,
            }],
            trailing_dot: false,
        });
        arena.set_completion_parent(hole, parent);

        assert_eq!(
            render_parent(&arena, &interner, hole),
            "Y<<CompleteOnType:Z>>"
        );
    }

    #[test]
    fn qualified_completion_carries_prefix() {
        let mut arena = AstArena::new();
        let interner = StringInterner::new();
        let z = simple_ref(&mut arena, &interner, "Z");
        let prefix = arena.alloc_type_ref(TypeRef {
            segments: vec![TypeSegment {
                name: interner.intern("Y"),
                span: Span::DUMMY,
                args: vec![TypeSlot::Ref(z)],
                has_args: true,
            }],
            trailing_dot: true,
        });
        let id = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnType,
            fragment: Name::EMPTY,
            qualifier: Some(prefix),
            selector: None,
            replaced: Span::DUMMY,
            parent: None,
        });
        assert_eq!(
            render_completion(&arena, &interner, id),
            "<CompleteOnType:Y<Z>.>"
        );
    }

    #[test]
    fn message_send_marker_shapes() {
        let mut arena = AstArena::new();
        let interner = StringInterner::new();
        let receiver = simple_ref(&mut arena, &interner, "bar");

        let send = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnMessageSend,
            fragment: Name::EMPTY,
            qualifier: Some(receiver),
            selector: Some(interner.intern("foo")),
            replaced: Span::DUMMY,
            parent: None,
        });
        assert_eq!(
            render_completion(&arena, &interner, send),
            "<CompleteOnMessageSend:bar.foo()>"
        );

        let name = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnMessageSendName,
            fragment: interner.intern("fo"),
            qualifier: Some(receiver),
            selector: None,
            replaced: Span::DUMMY,
            parent: None,
        });
        assert_eq!(
            render_completion(&arena, &interner, name),
            "<CompleteOnMessageSendName:bar.fo>"
        );
    }

    #[test]
    fn unit_skeleton_renders_field_with_hole() {
        let mut arena = AstArena::new();
        let interner = StringInterner::new();
        let hole = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnType,
            fragment: interner.intern("Z"),
            qualifier: None,
            selector: None,
            replaced: Span::DUMMY,
            parent: None,
        });
        let field_ty = arena.alloc_type_ref(TypeRef {
            segments: vec![TypeSegment {
                name: interner.intern("Y"),
                span: Span::DUMMY,
                args: vec![TypeSlot::Hole(hole)],
                has_args: true,
            }],
            trailing_dot: false,
        });

        let unit = ParseUnit {
            types: vec![TypeDecl {
                modifiers: vec![crate::ast::Modifier::Public],
                kind: crate::ast::TypeDeclKind::Class,
                name: interner.intern("X"),
                type_params: Vec::new(),
                superclass: None,
                interfaces: Vec::new(),
                members: vec![Member::Field(crate::ast::FieldDecl {
                    modifiers: vec![crate::ast::Modifier::Public],
                    ty: TypeSlot::Ref(field_ty),
                    name: interner.intern("var"),
                })],
            }],
            completion: Some(hole),
            cursor_in_skipped_body: false,
        };

        assert_eq!(
            render_unit(&arena, &interner, &unit),
            "public class X {\n  public Y<<CompleteOnType:Z>> var;\n}"
        );
    }

}
