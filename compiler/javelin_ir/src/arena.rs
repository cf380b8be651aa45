//! Flat arena for partial AST nodes.
//!
//! Type references and completion nodes are allocated here and referenced by
//! index, which lets a reference embed a completion hole (and the hole point
//! back at its structural parent) without boxed cycles.

use crate::ast::{CompletionId, CompletionNode, TypeRef, TypeRefId};

/// Arena owning every [`TypeRef`] and [`CompletionNode`] of one parse.
#[derive(Debug, Default)]
pub struct AstArena {
    type_refs: Vec<TypeRef>,
    completions: Vec<CompletionNode>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena::default()
    }

    /// Allocate a type reference, returning its index.
    pub fn alloc_type_ref(&mut self, type_ref: TypeRef) -> TypeRefId {
        let id = TypeRefId(u32::try_from(self.type_refs.len()).unwrap_or(u32::MAX));
        self.type_refs.push(type_ref);
        id
    }

    /// Allocate a completion node, returning its index.
    pub fn alloc_completion(&mut self, node: CompletionNode) -> CompletionId {
        let id = CompletionId(u32::try_from(self.completions.len()).unwrap_or(u32::MAX));
        self.completions.push(node);
        id
    }

    #[inline]
    pub fn type_ref(&self, id: TypeRefId) -> &TypeRef {
        &self.type_refs[id.0 as usize]
    }

    #[inline]
    pub fn completion(&self, id: CompletionId) -> &CompletionNode {
        &self.completions[id.0 as usize]
    }

    /// Set the structural parent of a completion node.
    ///
    /// Write-once: the parent relation is fixed at construction time.
    pub fn set_completion_parent(&mut self, id: CompletionId, parent: TypeRefId) {
        let node = &mut self.completions[id.0 as usize];
        debug_assert!(node.parent.is_none(), "completion parent set twice");
        node.parent = Some(parent);
    }

    /// Number of completion nodes allocated (at most one reaches the unit).
    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompletionKind, TypeSegment};
    use crate::{Name, Span};

    #[test]
    fn alloc_and_lookup_roundtrip() {
        let mut arena = AstArena::new();
        let type_ref = TypeRef {
            segments: vec![TypeSegment::simple(Name::EMPTY, Span::new(0, 1))],
            trailing_dot: false,
        };
        let ref_id = arena.alloc_type_ref(type_ref);

        let node_id = arena.alloc_completion(CompletionNode {
            kind: CompletionKind::OnType,
            fragment: Name::EMPTY,
            qualifier: None,
            selector: None,
            replaced: Span::new(0, 1),
            parent: None,
        });

        arena.set_completion_parent(node_id, ref_id);
        assert_eq!(arena.completion(node_id).parent, Some(ref_id));
        assert_eq!(arena.type_ref(ref_id).segments.len(), 1);
        assert_eq!(arena.completion_count(), 1);
    }
}
