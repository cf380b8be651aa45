//! Javelin IR - core data types for the completion parser.
//!
//! This crate contains the data structures shared by the lexer and the
//! recovery-aware parser:
//! - Spans for byte-exact source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - The partial AST (`ParseUnit`, `TypeRef`, `CompletionNode`) built by
//!   recovery parsing, allocated in a flat arena
//! - The display renderer that turns a recovered unit into its canonical
//!   comparison string
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: strings become `Name(u32)` handles
//! - **Flatten the tree**: no `Box<TypeRef>`, children are arena indices
//! - **Write-once**: a parse produces a read-only tree; the structural
//!   `parent` link of a completion node is set exactly once

mod arena;
pub mod ast;
mod interner;
mod name;
mod render;
mod span;
mod token;

pub use arena::AstArena;
pub use ast::{
    CompletionId, CompletionKind, CompletionNode, FieldDecl, Member, MethodBody, MethodDecl,
    Modifier, ParamDecl, ParseUnit, Stmt, TypeDecl, TypeDeclKind, TypeParam, TypeRef, TypeRefId,
    TypeSegment, TypeSlot,
};
pub use interner::StringInterner;
pub use name::Name;
pub use render::{render_completion, render_parent, render_unit};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};

/// Sentinel used for all output fields when no completion node was produced.
pub const NONE_SENTINEL: &str = "<NONE>";
