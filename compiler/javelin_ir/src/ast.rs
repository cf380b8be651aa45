//! Partial AST produced by recovery parsing.
//!
//! The tree is deliberately skeletal: recovery parsing reconstructs
//! declaration shells and at most one synthetic completion node. Recursive
//! structure is flattened into [`AstArena`](crate::AstArena) indices so a
//! type reference can embed a completion hole without boxed cycles.

use crate::{Name, Span};

/// Index of a [`TypeRef`] in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRefId(pub(crate) u32);

/// Index of a [`CompletionNode`] in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompletionId(pub(crate) u32);

/// A type position that either holds a real reference or the designated
/// completion hole.
///
/// Used uniformly for generic arguments, bounds, supertypes, field types,
/// return types, parameter types, throws entries, and catch parameters.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TypeSlot {
    Ref(TypeRefId),
    Hole(CompletionId),
}

/// One segment of a (possibly qualified, possibly generic) type reference:
/// `Y<Z>` in `Y<Z>.V<W>`.
#[derive(Clone, Debug)]
pub struct TypeSegment {
    pub name: Name,
    pub span: Span,
    /// Generic arguments; may embed the completion hole.
    pub args: Vec<TypeSlot>,
    /// Whether a `<` was seen for this segment (distinguishes `Y` from a
    /// truncated `Y<`).
    pub has_args: bool,
}

impl TypeSegment {
    pub fn simple(name: Name, span: Span) -> Self {
        TypeSegment {
            name,
            span,
            args: Vec::new(),
            has_args: false,
        }
    }
}

/// A (possibly partial) type reference.
///
/// Invariant: a reference embedding a completion hole is only ever the
/// outermost structure handed back to the caller; the hole is the single
/// designated gap.
#[derive(Clone, Debug, Default)]
pub struct TypeRef {
    pub segments: Vec<TypeSegment>,
    /// `Y<Z>.` — ended with a dot and nothing after it. Only meaningful for
    /// qualifier prefixes stored on completion nodes.
    pub trailing_dot: bool,
}

/// Which kind of completion node was produced.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompletionKind {
    OnType,
    OnName,
    OnKeyword,
    OnException,
    OnClass,
    OnInterface,
    OnMessageSend,
    OnMessageSendName,
    OnAllocationExpression,
}

impl CompletionKind {
    /// Label used inside the `<CompleteOn...>` marker.
    pub const fn marker_label(self) -> &'static str {
        match self {
            CompletionKind::OnType => "Type",
            CompletionKind::OnName => "Name",
            CompletionKind::OnKeyword => "Keyword",
            CompletionKind::OnException => "Exception",
            CompletionKind::OnClass => "Class",
            CompletionKind::OnInterface => "Interface",
            CompletionKind::OnMessageSend => "MessageSend",
            CompletionKind::OnMessageSendName => "MessageSendName",
            CompletionKind::OnAllocationExpression => "AllocationExpression",
        }
    }
}

/// The synthetic node marking where in-progress typing was interrupted.
///
/// Exactly one exists per successful recovery parse.
#[derive(Clone, Debug)]
pub struct CompletionNode {
    pub kind: CompletionKind,
    /// The fragment already typed; may be empty (cursor immediately after a
    /// delimiter like `.` or `<`).
    pub fragment: Name,
    /// Already-parsed prefix rendered inside the marker: the qualifier of a
    /// qualified reference, the receiver of a message send, or the type of
    /// an allocation.
    pub qualifier: Option<TypeRefId>,
    /// Message-send selector (`OnMessageSend` only).
    pub selector: Option<Name>,
    /// Exact source span a real completion would replace; may be empty for
    /// zero-width insertions.
    pub replaced: Span,
    /// Enclosing partially-built construct, as an arena index. Structural
    /// ownership only; set exactly once.
    pub parent: Option<TypeRefId>,
}

/// Declaration modifiers, rendered in source order.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }
}

/// Kind of type declaration.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

impl TypeDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            TypeDeclKind::Class => "class",
            TypeDeclKind::Interface => "interface",
            TypeDeclKind::Enum => "enum",
        }
    }
}

/// A declared type parameter: `T extends Y<Z> & Cloneable`.
#[derive(Clone, Debug)]
pub struct TypeParam {
    pub name: Name,
    pub bounds: Vec<TypeSlot>,
}

/// A reconstructed type declaration shell.
#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub modifiers: Vec<Modifier>,
    pub kind: TypeDeclKind,
    pub name: Name,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeSlot>,
    pub interfaces: Vec<TypeSlot>,
    pub members: Vec<Member>,
}

/// A class/interface member that survived recovery.
#[derive(Clone, Debug)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Nested(TypeDecl),
    Initializer { is_static: bool, body: MethodBody },
    /// A dangling reference at member position, kept for its embedded
    /// completion hole (e.g. `Y<Z>.` with nothing after).
    Dangling(TypeSlot),
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeSlot,
    pub name: Name,
}

#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub ty: TypeSlot,
    pub name: Name,
}

#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParam>,
    /// `None` for constructors.
    pub return_ty: Option<TypeSlot>,
    pub name: Name,
    pub params: Vec<ParamDecl>,
    pub throws: Vec<TypeSlot>,
    pub body: MethodBody,
}

/// A method body after recovery.
#[derive(Clone, Debug)]
pub enum MethodBody {
    /// Declared without a body (`;`) — abstract/interface methods.
    Absent,
    /// Body skipped as an opaque token span and reduced to `{}`.
    Stub,
    /// The one body expanded in full mode; statements that survived
    /// recovery, in order.
    Recovered(Vec<Stmt>),
}

/// Statements reconstructed inside a recovered body.
///
/// Recovery flattens control structure: the observable results are the
/// explicit constructor call, declaration skeletons, and the dangling
/// reference carrying the completion hole.
#[derive(Clone, Debug)]
pub enum Stmt {
    /// `super();` — explicit constructor calls always survive intact.
    SuperCall,
    /// `Y<Z> x;` — local declaration skeleton, initializer dropped.
    LocalDecl { ty: TypeSlot, name: Option<Name> },
    /// A dangling reference or expression hole rendered as its own
    /// trailing statement.
    Dangling(TypeSlot),
}

/// Root of one parse invocation.
///
/// Owns zero or one completion node plus the reconstructed declarations.
/// Created once per invocation and read-only thereafter.
#[derive(Clone, Debug, Default)]
pub struct ParseUnit {
    pub types: Vec<TypeDecl>,
    pub completion: Option<CompletionId>,
    /// Diet mode only: the cursor fell inside a skipped body, so this pass
    /// reports no completion and defers to full mode.
    pub cursor_in_skipped_body: bool,
}
