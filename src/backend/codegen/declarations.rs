//! Class emission for code generation
//!
//! A class becomes a constructor function: property defaults, an arity switch over the initializers, and the
//! initializers as inner functions. Methods are attached to the prototype after the constructor.

use std::collections::BTreeMap;

use crate::backend::errors::EmitError;
use crate::frontend::ast::*;

use super::JsCodegen;
use super::functions::param_list;

impl JsCodegen<'_> {
    pub(crate) fn emit_class(&mut self, class: &ClassDecl, id: NodeId) -> Result<(), EmitError> {
        let mut lets = Vec::new();
        let mut vars = Vec::new();
        let mut initializers: BTreeMap<usize, &InitDecl> = BTreeMap::new();
        let mut methods = Vec::new();

        for stmt in &class.body.statements {
            match &stmt.node {
                Stmt::Decl(decl) => match decl.kind {
                    DeclKind::Let => lets.push(decl),
                    DeclKind::Var => vars.push(decl),
                },
                Stmt::Init(init) => {
                    let arity = init.params.len();
                    if initializers.insert(arity, init).is_some() {
                        return Err(EmitError::InitializerCollision {
                            class: class.name.clone(),
                            arity,
                        });
                    }
                }
                Stmt::Function(method) => {
                    let name = method
                        .name
                        .as_deref()
                        .ok_or_else(|| EmitError::Unsupported(format!("unnamed method in class '{}'", class.name)))?;
                    methods.push((name, method));
                }
                _ => {
                    return Err(EmitError::Unsupported(format!(
                        "statement in the body of class '{}'",
                        class.name
                    )));
                }
            }
        }
        tracing::debug!(class = %class.name, node = %id, initializers = initializers.len(), methods = methods.len(), "emitting class");

        self.emitter.open_block(&format!("function {} ()", class.name));

        for decl in lets.iter().chain(vars.iter()) {
            if let Some(value) = &decl.value {
                let value = self.render_expr(value)?;
                self.emitter.line(&format!("this.{} = {};", decl.name, value));
            }
        }

        if !initializers.is_empty() {
            self.emitter.open_block("switch (arguments.length)");
            for &arity in initializers.keys() {
                let mut call_args = vec!["this".to_string()];
                call_args.extend((0..arity).map(|i| format!("arguments[{}]", i)));
                self.emitter.line(&format!("case {}:", arity));
                self.emitter.indent();
                self.emitter
                    .line(&format!("init{}.call({}); break;", arity, call_args.join(", ")));
                self.emitter.dedent();
            }
            self.emitter.line("default:");
            self.emitter.indent();
            self.emitter.line("throw new Error('No initializer found');");
            self.emitter.dedent();
            self.emitter.close_block();

            for (arity, init) in &initializers {
                self.emitter
                    .line(&format!("function init{} ({}) {{", arity, param_list(&init.params)));
                self.emit_function_body(&init.params, &init.block)?;
                self.emitter.line("}");
            }
        }

        self.emitter.close_block();

        for (name, method) in methods {
            let function = self.render_function_expr(method)?;
            self.emitter
                .line(&format!("{}.prototype.{} = {};", class.name, name, function));
        }
        Ok(())
    }
}
