//! Wren Compiler Backend
//!
//! This module handles code generation from the type-checked tree to JavaScript-flavoured source.
//!
//! The pipeline is:
//! 1. Program + `TypeCheckInfo` from the frontend → `JsCodegen` → source string
//!
//! ## Module Organization
//!
//! - `codegen/` - Code generation from the tree
//!   - `mod.rs` - Main JsCodegen struct and entry point
//!   - `declarations.rs` - Class emission
//!   - `functions.rs` - Function and multi emission
//!   - `statements.rs` - Statement emission
//!   - `expressions.rs` - Expression rendering
//! - `js_emitter.rs` - Low-level indentation-aware string builder
//! - `errors.rs` - Emission errors

pub mod codegen;
pub mod errors;
pub mod js_emitter;

pub use codegen::JsCodegen;
pub use errors::EmitError;
