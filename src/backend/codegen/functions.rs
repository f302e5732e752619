//! Function and multi emission for code generation

use crate::backend::errors::EmitError;
use crate::frontend::ast::*;
use crate::frontend::types::Implementor;

use super::JsCodegen;
use super::expressions::render_literal;
use super::statements::FunctionIndex;

pub(crate) fn param_list(params: &[Param]) -> String {
    params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
}

impl JsCodegen<'_> {
    /// Default-argument checks and the body, one level deeper than the opening line.
    pub(crate) fn emit_function_body(&mut self, params: &[Param], body: &Block) -> Result<(), EmitError> {
        self.emitter.indent();
        let result = self.emit_defaults_and_body(params, body);
        self.emitter.dedent();
        result
    }

    fn emit_defaults_and_body(&mut self, params: &[Param], body: &Block) -> Result<(), EmitError> {
        for param in params {
            if let Some(default) = &param.default {
                let value = render_literal(&default.node)?;
                self.emitter
                    .line(&format!("if ({0} === undefined) {{ {0} = {1}; }}", param.name, value));
            }
        }
        self.emit_statements(&body.statements)
    }

    /// `function (a, b) { ... }` with the closing brace at the current indentation and no trailing newline.
    pub(crate) fn render_function_expr(&mut self, function: &Function) -> Result<String, EmitError> {
        self.capture(|this| {
            this.emitter
                .writef(format_args!("function ({}) {{\n", param_list(&function.params)));
            this.emit_function_body(&function.params, &function.body)?;
            this.emitter.write_indent();
            this.emitter.write("}");
            Ok(())
        })
    }

    /// Implementors are emitted inside their multi.
    pub(crate) fn emit_function_stmt(&mut self, function: &Function, id: NodeId) -> Result<(), EmitError> {
        if self.info.is_multi_member(id) {
            return Ok(());
        }
        let Some(name) = &function.name else {
            return Err(EmitError::Unsupported("function statement without a name".to_string()));
        };
        self.emitter
            .line(&format!("function {} ({}) {{", name, param_list(&function.params)));
        self.emit_function_body(&function.params, &function.body)?;
        self.emitter.line("}");
        Ok(())
    }

    /// A dispatcher testing guards in declaration order, falling back to the single unguarded implementor, followed by
    /// every implementor as an inner function.
    pub(crate) fn emit_multi(
        &mut self,
        decl: &MultiDecl,
        id: NodeId,
        functions: &FunctionIndex<'_>,
    ) -> Result<(), EmitError> {
        let info = self.info;
        let multi = info
            .multi_type(id)
            .ok_or_else(|| EmitError::MissingTypeInfo(format!("multi '{}'", decl.name)))?;

        let mut members: Vec<(Implementor, &Function)> = Vec::new();
        for implementor in multi.implementors() {
            let function = functions
                .get(&implementor.function)
                .copied()
                .ok_or_else(|| EmitError::MissingImplementor {
                    multi: decl.name.clone(),
                    implementor: implementor.name.clone(),
                })?;
            members.push((implementor, function));
        }

        let defaults: Vec<&Implementor> = members.iter().map(|(i, _)| i).filter(|i| !i.guarded).collect();
        if defaults.len() > 1 {
            return Err(EmitError::MultipleDefaults {
                multi: decl.name.clone(),
                count: defaults.len(),
            });
        }
        tracing::debug!(multi = %decl.name, implementors = members.len(), "emitting multi dispatcher");

        let args = decl.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        self.emitter.open_block(&format!("function {} ({})", decl.name, args));

        self.emitter.open_block("switch (false)");
        for (implementor, function) in &members {
            let Some(guard) = &function.when else {
                continue;
            };
            let guard = self.render_expr(guard)?;
            self.emitter.line(&format!("case !({}):", guard));
            self.emitter.indent();
            self.emitter.line(&format!("return {}({});", implementor.name, args));
            self.emitter.dedent();
        }
        self.emitter.line("default:");
        self.emitter.indent();
        match defaults.first() {
            Some(default) => self.emitter.line(&format!("return {}({});", default.name, args)),
            None => self.emitter.line("throw new Error('Fell through to default branch');"),
        }
        self.emitter.dedent();
        self.emitter.close_block();

        for (implementor, function) in &members {
            self.emitter
                .line(&format!("function {} ({}) {{", implementor.name, param_list(&function.params)));
            self.emit_function_body(&function.params, &function.body)?;
            self.emitter.line("}");
        }

        self.emitter.close_block();
        Ok(())
    }
}
