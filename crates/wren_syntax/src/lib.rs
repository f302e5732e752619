//! Shared syntax tree for the Wren language.
//!
//! The parser lives outside this workspace; it hands the checker a fully formed [`ast::Program`]. Tests and tools that
//! need trees without a parser use the [`build`] helpers.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not do name resolution, type checking, or code generation.
//! - Every node is wrapped in [`ast::Spanned`], which carries a byte-offset span and a [`ast::NodeId`]. Later stages key
//!   their side tables by `NodeId` instead of mutating the tree.
//!
//! ## Examples
//! ```rust
//! use wren_syntax::build::*;
//!
//! let program = program(vec![let_("x", None, Some(int(1)))]);
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
pub mod build;
