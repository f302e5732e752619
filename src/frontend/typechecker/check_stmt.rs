//! Statement dispatch, control flow, path assignment and `return`.

use wren_syntax::ast::*;

use super::{BlockReturns, MultiIndex, TypeChecker};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::scope::ScopeKind;
use crate::frontend::types::{self, Ty};

impl TypeChecker {
    pub(crate) fn check_stmt(
        &mut self,
        stmt: &Spanned<Stmt>,
        multis: &MultiIndex<'_>,
        returns: &mut BlockReturns,
    ) -> Result<(), CompileError> {
        match &stmt.node {
            Stmt::Decl(decl) => self.check_decl(decl, stmt.id, stmt.span),
            Stmt::Assign(assign) => self.check_path_assign(assign, stmt.id, stmt.span),
            Stmt::If(if_stmt) => self.check_if(if_stmt, returns),
            Stmt::While(while_stmt) => {
                self.resolve_expr(&while_stmt.cond)?;
                returns.absorb(self.check_block(&while_stmt.block, ScopeKind::Block)?);
                Ok(())
            }
            Stmt::For(for_stmt) => self.check_for(for_stmt, returns),
            Stmt::Return(value) => self.check_return(value.as_ref(), stmt.span, returns),
            Stmt::Binary(binary) => self.check_binary_stmt(binary, stmt.id, stmt.span),
            Stmt::Chain(chain) => {
                let ty = self.resolve_chain(chain, stmt.span)?;
                self.record(stmt.id, &ty);
                Ok(())
            }
            Stmt::Function(function) => self.check_function_stmt(function, stmt.id, stmt.span, multis),
            Stmt::Multi(decl) => self.check_multi(decl, stmt.id, stmt.span),
            Stmt::Class(decl) => self.check_class(decl, stmt.id, stmt.span),
            Stmt::Init(_) => Err(errors::invalid_statement(
                "`init` is only allowed inside a class body",
                stmt.span,
            )),
        }
    }

    fn check_if(&mut self, if_stmt: &IfStmt, returns: &mut BlockReturns) -> Result<(), CompileError> {
        self.resolve_expr(&if_stmt.cond)?;
        returns.absorb(self.check_block(&if_stmt.then_block, ScopeKind::Block)?);

        for else_if in &if_stmt.else_ifs {
            self.resolve_expr(&else_if.cond)?;
            returns.absorb(self.check_block(&else_if.block, ScopeKind::Block)?);
        }

        if let Some(else_block) = &if_stmt.else_block {
            returns.absorb(self.check_block(else_block, ScopeKind::Block)?);
        }
        Ok(())
    }

    fn check_for(&mut self, for_stmt: &ForStmt, returns: &mut BlockReturns) -> Result<(), CompileError> {
        // The loop variable lives in the header scope and is gone after the loop.
        let body = self.in_scope(ScopeKind::ForHeader, |this| {
            let no_multis = MultiIndex::new();
            let mut header_returns = BlockReturns::default();
            this.check_stmt(&for_stmt.init, &no_multis, &mut header_returns)?;

            if let Some(cond) = &for_stmt.cond {
                let cond_ty = this.resolve_expr(cond)?;
                let boolean = Ty::instance(this.scopes.builtin(types::BOOLEAN)?);
                if !cond_ty.is_instance() || !cond_ty.equals(&boolean)? {
                    return Err(errors::type_mismatch(&boolean, &cond_ty, cond.span)
                        .with_note("A `for` condition must be a Boolean"));
                }
            }

            this.check_stmt(&for_stmt.after, &no_multis, &mut header_returns)?;
            if header_returns.direct.is_some() {
                return Err(errors::invalid_statement(
                    "`return` is not allowed in a `for` header",
                    for_stmt.init.span,
                ));
            }
            this.check_block(&for_stmt.block, ScopeKind::Block)
        })?;
        returns.absorb(body);
        Ok(())
    }

    fn check_return(
        &mut self,
        value: Option<&Spanned<Expr>>,
        span: Span,
        returns: &mut BlockReturns,
    ) -> Result<(), CompileError> {
        let ty = match value {
            Some(expr) => self.resolve_expr(expr)?,
            None => Ty::instance(self.scopes.builtin(types::VOID)?),
        };
        let Some(inner) = ty.unbox() else {
            return Err(CompileError::internal(format!(
                "Return value resolved to {} instead of a value",
                ty.describe()
            ))
            .with_span(span));
        };
        if returns.direct.is_some() {
            return Err(errors::block_already_returned(span));
        }
        returns.direct = Some((inner.clone(), span));
        Ok(())
    }

    fn check_path_assign(&mut self, assign: &PathAssign, id: NodeId, span: Span) -> Result<(), CompileError> {
        let Some(scope) = self.scopes.find_scope_for_name(&assign.name) else {
            return Err(errors::assign_to_undeclared(&assign.name, span));
        };
        let base = self
            .scopes
            .binding_in(scope, &assign.name)
            .ok_or_else(|| CompileError::internal(format!("Binding for '{}' vanished", assign.name)))?;

        let value_ty = self.resolve_expr(&assign.value)?;
        if !value_ty.is_instance() {
            return Err(errors::not_an_instance(value_ty.describe(), assign.value.span));
        }

        // The first assignment to a bare name declared without type or initializer fixes its type.
        if let (Ty::Unknown(cell), true) = (&base, assign.path.is_empty()) {
            if !cell.is_resolved() {
                cell.resolve(value_ty.clone())?;
                self.record(id, &value_ty);
                return Ok(());
            }
        }

        let mut current = base
            .known()
            .map_err(|_| errors::unresolved_type(&assign.name, span))?;
        for segment in &assign.path {
            current = self.check_property(&current, &segment.node, segment.span)?;
        }

        if !current.is_instance() {
            return Err(errors::not_an_instance(current.describe(), span));
        }
        if !current.equals(&value_ty)? {
            return Err(errors::type_mismatch(&current, &value_ty, assign.value.span));
        }
        self.record(id, &current);
        Ok(())
    }

    fn check_binary_stmt(&mut self, binary: &BinaryExpr, id: NodeId, span: Span) -> Result<(), CompileError> {
        if !binary.op.is_compound_assign() {
            return Err(errors::invalid_statement(
                &format!("Binary expression with `{}` cannot be used as a statement", binary.op),
                span,
            ));
        }
        if !matches!(binary.lhs.node, Expr::Chain(_)) {
            return Err(errors::invalid_statement(
                "Left side of `+=` must be a name or property path",
                binary.lhs.span,
            ));
        }
        let ty = self.check_operands(binary)?;
        self.record(id, &ty);
        Ok(())
    }
}
