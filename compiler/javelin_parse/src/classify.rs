//! Completion-node classification.
//!
//! The grammar records *where* the cursor token was consumed as a
//! [`GrammarContext`]; classification to a [`CompletionKind`] is a pure
//! total function over that context. Keeping the mapping in one table makes
//! the classification policy auditable in one place.

use javelin_ir::CompletionKind;

/// The grammatical position in which a completion trigger fired.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum GrammarContext {
    /// Bound of a type parameter whose list is still open.
    TypeParameterBound,
    /// `extends` clause of a class.
    Superclass,
    /// `implements` list, or `extends` list of an interface.
    Interface,
    /// Type of a field or member declaration.
    FieldType,
    /// Return type of a method.
    ReturnType,
    /// Type of a method parameter.
    ParameterType,
    /// Type of a local variable declaration.
    LocalType,
    /// Declaration type in a `for` initializer.
    ForInitType,
    /// Argument inside a generic type argument list.
    TypeArgument,
    /// Entry in a `throws` list.
    Throws,
    /// Parameter of a `catch` clause.
    CatchParameter,
    /// Qualified or simple name in expression position, including the
    /// cast-or-comparison ambiguity inside parens.
    ExpressionName,
    /// Explicit constructor call type arguments (`<...>super(...)`).
    ExplicitCtorTypeArgument,
    /// Type of an allocation (`new T`); completion is suppressed here, the
    /// argument parens are required to trigger.
    AllocationType,
    /// Argument position of a message send (`recv.sel(`).
    MessageSendArgument,
    /// Selector of a message send with an argument list following.
    MessageSendSelector,
    /// Argument position of an allocation (`new T(`).
    AllocationArgument,
    /// Keyword position: unit start, member-modifier run, or the
    /// extends/implements slot of a declaration header.
    KeywordPosition,
}

impl GrammarContext {
    /// Whether triggers are suppressed in this context.
    ///
    /// An allocation without its argument parens never completes.
    pub(crate) fn suppresses_completion(self) -> bool {
        matches!(self, GrammarContext::AllocationType)
    }

    /// Context for arguments nested inside a type argument list opened in
    /// this context.
    ///
    /// Nested arguments demote to plain type completion, except in
    /// expression position where the name ambiguity is preserved, and in
    /// allocation position where suppression stays in force.
    pub(crate) fn nested(self) -> GrammarContext {
        match self {
            GrammarContext::ExpressionName => GrammarContext::ExpressionName,
            GrammarContext::AllocationType => GrammarContext::AllocationType,
            _ => GrammarContext::TypeArgument,
        }
    }
}

/// Map a grammar context to the completion-node kind it produces.
pub(crate) fn classify(ctx: GrammarContext) -> CompletionKind {
    match ctx {
        GrammarContext::Superclass => CompletionKind::OnClass,
        GrammarContext::Interface => CompletionKind::OnInterface,
        GrammarContext::Throws | GrammarContext::CatchParameter => CompletionKind::OnException,
        GrammarContext::ExpressionName => CompletionKind::OnName,
        GrammarContext::KeywordPosition => CompletionKind::OnKeyword,
        GrammarContext::MessageSendArgument => CompletionKind::OnMessageSend,
        GrammarContext::MessageSendSelector => CompletionKind::OnMessageSendName,
        GrammarContext::AllocationArgument => CompletionKind::OnAllocationExpression,
        GrammarContext::TypeParameterBound
        | GrammarContext::FieldType
        | GrammarContext::ReturnType
        | GrammarContext::ParameterType
        | GrammarContext::LocalType
        | GrammarContext::ForInitType
        | GrammarContext::TypeArgument
        | GrammarContext::ExplicitCtorTypeArgument
        | GrammarContext::AllocationType => CompletionKind::OnType,
    }
}
