//! Completion-node construction.
//!
//! The grammar calls into these helpers at every position where an
//! identifier or pending delimiter is consumed; the helpers decide whether
//! the cursor falls on that token and, if so, synthesize the single
//! completion node of the parse.

use crate::classify::{classify, GrammarContext};
use crate::Parser;
use javelin_ir::{
    CompletionId, CompletionKind, CompletionNode, Name, Span, TypeRef, TypeRefId, TypeSegment,
    TypeSlot,
};

impl Parser<'_> {
    /// Whether `span` holds the typed-cursor offset and no completion node
    /// has been produced yet.
    ///
    /// Containment is half-open (`start <= cursor < end`), which gives
    /// boundary exactness: the closing `>` of a finished argument list never
    /// triggers for that list.
    pub(crate) fn at_completion(&self, span: Span) -> bool {
        self.completion.is_none() && span.contains(self.offset)
    }

    /// Intern the fragment typed so far: the token bytes from its start
    /// through the cursor offset, inclusive.
    pub(crate) fn fragment_of(&self, span: Span) -> Name {
        let text = self
            .source
            .get(span.start as usize..=self.offset as usize)
            .unwrap_or("");
        self.interner.intern(text)
    }

    /// Synthesize the completion node for a trigger in `ctx`.
    pub(crate) fn trigger(
        &mut self,
        ctx: GrammarContext,
        fragment: Name,
        qualifier: Option<TypeRefId>,
        replaced: Span,
    ) -> CompletionId {
        self.emit_completion(classify(ctx), fragment, qualifier, None, replaced)
    }

    /// Synthesize a message-send completion node carrying the selector.
    pub(crate) fn trigger_send(
        &mut self,
        receiver: Option<TypeRefId>,
        selector: Name,
        replaced: Span,
    ) -> CompletionId {
        self.emit_completion(
            classify(GrammarContext::MessageSendArgument),
            Name::EMPTY,
            receiver,
            Some(selector),
            replaced,
        )
    }

    fn emit_completion(
        &mut self,
        kind: CompletionKind,
        fragment: Name,
        qualifier: Option<TypeRefId>,
        selector: Option<Name>,
        replaced: Span,
    ) -> CompletionId {
        debug_assert!(self.completion.is_none(), "second completion node");
        let id = self.arena.alloc_completion(CompletionNode {
            kind,
            fragment,
            qualifier,
            selector,
            replaced,
            parent: None,
        });
        self.completion = Some(id);
        tracing::debug!(?kind, ?replaced, "completion trigger");
        id
    }

    /// Wrap already-parsed segments into a qualifier prefix rendered with a
    /// trailing dot inside the completion marker (`Y<Z>.`).
    pub(crate) fn qualifier_from(&mut self, segments: &[TypeSegment]) -> Option<TypeRefId> {
        if segments.is_empty() {
            None
        } else {
            Some(self.arena.alloc_type_ref(TypeRef {
                segments: segments.to_vec(),
                trailing_dot: true,
            }))
        }
    }

    /// Wrap segments into a message-send receiver (no trailing dot; the
    /// renderer inserts the separator).
    pub(crate) fn receiver_from(&mut self, segments: Vec<TypeSegment>) -> Option<TypeRefId> {
        if segments.is_empty() {
            None
        } else {
            Some(self.arena.alloc_type_ref(TypeRef {
                segments,
                trailing_dot: false,
            }))
        }
    }

    /// Whether a slot embeds the completion hole anywhere.
    pub(crate) fn slot_has_hole(&self, slot: TypeSlot) -> bool {
        match slot {
            TypeSlot::Hole(_) => true,
            TypeSlot::Ref(id) => self
                .arena
                .type_ref(id)
                .segments
                .iter()
                .any(|seg| seg.args.iter().any(|arg| self.slot_has_hole(*arg))),
        }
    }
}
