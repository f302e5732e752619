//! Statement emission for code generation

use std::collections::HashMap;

use crate::backend::errors::EmitError;
use crate::frontend::ast::*;

use super::JsCodegen;

/// Function statements of one block, so a multi can find its implementors.
pub(crate) type FunctionIndex<'a> = HashMap<NodeId, &'a Function>;

impl JsCodegen<'_> {
    /// Emit statements at the current indentation.
    pub(crate) fn emit_statements(&mut self, statements: &[Spanned<Stmt>]) -> Result<(), EmitError> {
        let functions: FunctionIndex<'_> = statements
            .iter()
            .filter_map(|stmt| match &stmt.node {
                Stmt::Function(function) => Some((stmt.id, function)),
                _ => None,
            })
            .collect();

        for stmt in statements {
            self.emit_statement(stmt, &functions)?;
        }
        Ok(())
    }

    /// Emit `header {`, the block one level deeper, then the closing brace.
    fn emit_braced(&mut self, header: &str, block: &Block) -> Result<(), EmitError> {
        self.emitter.open_block(header);
        self.emit_statements(&block.statements)?;
        self.emitter.close_block();
        Ok(())
    }

    fn emit_statement(&mut self, stmt: &Spanned<Stmt>, functions: &FunctionIndex<'_>) -> Result<(), EmitError> {
        match &stmt.node {
            Stmt::Decl(_) | Stmt::Assign(_) | Stmt::Binary(_) | Stmt::Chain(_) => {
                let text = self.render_simple_statement(stmt)?;
                self.emitter.line(&format!("{};", text));
            }
            Stmt::Return(None) => self.emitter.line("return;"),
            Stmt::Return(Some(value)) => {
                let value = self.render_expr(value)?;
                self.emitter.line(&format!("return {};", value));
            }
            Stmt::If(if_stmt) => self.emit_if(if_stmt)?,
            Stmt::While(while_stmt) => {
                let cond = self.render_expr(&while_stmt.cond)?;
                self.emit_braced(&format!("while ({})", cond), &while_stmt.block)?;
            }
            Stmt::For(for_stmt) => self.emit_for(for_stmt)?,
            Stmt::Function(function) => self.emit_function_stmt(function, stmt.id)?,
            Stmt::Multi(multi) => self.emit_multi(multi, stmt.id, functions)?,
            Stmt::Class(class) => self.emit_class(class, stmt.id)?,
            Stmt::Init(_) => {
                return Err(EmitError::Unsupported("initializer outside a class body".to_string()));
            }
        }
        Ok(())
    }

    /// Render a one-line statement without its terminator.
    fn render_simple_statement(&mut self, stmt: &Spanned<Stmt>) -> Result<String, EmitError> {
        match &stmt.node {
            Stmt::Decl(decl) => match &decl.value {
                Some(value) => Ok(format!("var {} = {}", decl.name, self.render_expr(value)?)),
                None => Ok(format!("var {}", decl.name)),
            },
            Stmt::Assign(assign) => {
                let mut target = assign.name.clone();
                for segment in &assign.path {
                    target.push('.');
                    target.push_str(&segment.node);
                }
                let value = self.render_expr(&assign.value)?;
                Ok(format!("{} {} {}", target, assign.op.as_str(), value))
            }
            Stmt::Binary(binary) => self.render_binary(binary),
            Stmt::Chain(chain) => self.render_chain(chain),
            _ => Err(EmitError::Unsupported(
                "only declarations, assignments and expressions may appear in a for header".to_string(),
            )),
        }
    }

    fn emit_if(&mut self, if_stmt: &IfStmt) -> Result<(), EmitError> {
        let cond = self.render_expr(&if_stmt.cond)?;
        self.emitter.open_block(&format!("if ({})", cond));
        self.emit_statements(&if_stmt.then_block.statements)?;

        for else_if in &if_stmt.else_ifs {
            let cond = self.render_expr(&else_if.cond)?;
            self.emitter.reopen_block(&format!("else if ({})", cond));
            self.emit_statements(&else_if.block.statements)?;
        }
        if let Some(else_block) = &if_stmt.else_block {
            self.emitter.reopen_block("else");
            self.emit_statements(&else_block.statements)?;
        }
        self.emitter.close_block();
        Ok(())
    }

    fn emit_for(&mut self, for_stmt: &ForStmt) -> Result<(), EmitError> {
        let init = self.render_simple_statement(&for_stmt.init)?;
        let cond = match &for_stmt.cond {
            Some(cond) => self.render_expr(cond)?,
            None => String::new(),
        };
        let after = self.render_simple_statement(&for_stmt.after)?;

        self.emit_braced(&format!("for ({}; {}; {})", init, cond, after), &for_stmt.block)
    }
}
