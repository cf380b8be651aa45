//! Grammar rules, organized by construct family.
//!
//! Each submodule extends [`Parser`](crate::Parser) with `impl` blocks so
//! rules can be grouped by what they parse while sharing one parser state:
//!
//! - [`item`]: compilation units, type declarations, members, bodies
//! - [`stmt`]: statement recovery inside the expanded body
//! - [`ty`]: type references and their argument lists

mod item;
mod stmt;
mod ty;
