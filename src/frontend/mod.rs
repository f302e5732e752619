//! Wren Compiler Frontend
//!
//! This module contains the checking half of the compiler:
//! - `scope`: lexical scopes and the built-in root scope
//! - `types`: type values (named, object, instance, function, multi, unknown)
//! - `typechecker`: the type-checking walker
//! - `diagnostics`: error reporting

// The syntax tree is provided by the shared wren_syntax crate.
pub use wren_syntax::ast;

pub mod diagnostics;
pub mod scope;
pub mod typechecker;
pub mod types;
