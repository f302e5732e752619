//! JavaScript code generation from a type-checked syntax tree
//!
//! [`JsCodegen`] is a second, read-only pass: it walks the same [`Program`] the checker visited and consults the
//! [`TypeCheckInfo`] side table for what the tree alone cannot tell it (which function statements belong to a multi,
//! the implementor order of each family).
//!
//! ## Module Organization
//!
//! - `statements.rs` - statement emission and block handling
//! - `expressions.rs` - expression rendering to strings
//! - `functions.rs` - function expressions, parameter defaults, multi dispatchers
//! - `declarations.rs` - class constructors, initializers and prototype methods
//!
//! ## Examples
//!
//! ```
//! use wren::frontend::typechecker::TypeChecker;
//! use wren::backend::JsCodegen;
//! use wren_syntax::build::*;
//!
//! let program = program(vec![var_("n", Some("Int"), None)]);
//! let mut checker = TypeChecker::new();
//! checker.check_program(&program).unwrap();
//! let js = JsCodegen::new(checker.type_info()).emit_program(&program).unwrap();
//! assert_eq!(js, "var n;\n");
//! ```

mod declarations;
mod expressions;
mod functions;
mod statements;

use crate::backend::errors::EmitError;
use crate::backend::js_emitter::JsEmitter;
use crate::config::EmitConfig;
use crate::frontend::ast::Program;
use crate::frontend::typechecker::TypeCheckInfo;

/// JavaScript code generator
pub struct JsCodegen<'a> {
    info: &'a TypeCheckInfo,
    emitter: JsEmitter,
}

impl<'a> JsCodegen<'a> {
    pub fn new(info: &'a TypeCheckInfo) -> Self {
        Self::with_emit_config(info, &EmitConfig::default())
    }

    fn with_emit_config(info: &'a TypeCheckInfo, config: &EmitConfig) -> Self {
        Self {
            info,
            emitter: JsEmitter::new(config.indent_width),
        }
    }

    pub fn with_config(self, config: EmitConfig) -> Self {
        Self::with_emit_config(self.info, &config)
    }

    /// Generate source for a whole program.
    #[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
    pub fn emit_program(mut self, program: &Program) -> Result<String, EmitError> {
        self.emit_statements(&program.statements)?;
        let output = self.emitter.finish();
        tracing::debug!(bytes = output.len(), "emitted program");
        Ok(output)
    }

    /// Run `f` against an empty emitter at the current indentation and return what it wrote.
    pub(crate) fn capture(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), EmitError>,
    ) -> Result<String, EmitError> {
        let nested = self.emitter.nested();
        let outer = std::mem::replace(&mut self.emitter, nested);
        let result = f(self);
        let inner = std::mem::replace(&mut self.emitter, outer);
        result.map(|()| inner.finish())
    }
}
