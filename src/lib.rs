#![forbid(unsafe_code)]
//! Wren Programming Language Compiler
//!
//! Wren is a small statically typed language with classes and multiple-dispatch function families. This crate takes a
//! parsed syntax tree, type checks it, and emits equivalent JavaScript-flavoured source text.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. Every failure is a
//!   [`CompileError`] or an [`EmitError`](backend::EmitError).
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//!
//! ```
//! use wren_syntax::build::*;
//!
//! let program = program(vec![let_("x", None, Some(int(1))), let_("y", Some("Int"), Some(ident("x")))]);
//! let js = wren::compile(&program).unwrap();
//! assert_eq!(js, "var x = 1;\nvar y = x;\n");
//! ```

pub mod backend;
pub mod config;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::typechecker;

pub use backend::JsCodegen;
pub use config::{CheckerConfig, EmitConfig};

use frontend::ast::Program;
use frontend::diagnostics::{CompileError, Warning};
use frontend::typechecker::TypeChecker;

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    pub output: String,
    pub warnings: Vec<Warning>,
}

/// Type check `program` and generate target source with default settings.
pub fn compile(program: &Program) -> Result<String, CompileError> {
    compile_with(program, &CheckerConfig::default(), &EmitConfig::default()).map(|c| c.output)
}

/// Type check `program`, then generate target source from the checked tree.
#[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
pub fn compile_with(
    program: &Program,
    checker_config: &CheckerConfig,
    emit_config: &EmitConfig,
) -> Result<Compilation, CompileError> {
    let mut checker = TypeChecker::new().with_config(checker_config.clone());
    checker.check_program(program)?;

    let output = JsCodegen::new(checker.type_info())
        .with_config(emit_config.clone())
        .emit_program(program)?;

    Ok(Compilation {
        output,
        warnings: checker.warnings().to_vec(),
    })
}
