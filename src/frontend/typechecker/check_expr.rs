//! Expression typing: literals, operators, call/property chains and `new`.

use wren_syntax::ast::*;

use super::TypeChecker;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::types::{self, Ty, UnknownType};

impl TypeChecker {
    pub(crate) fn resolve_expr(&mut self, expr: &Spanned<Expr>) -> Result<Ty, CompileError> {
        self.resolve_expr_hooked(expr, None)
    }

    /// Resolve an expression, memoized per node.
    ///
    /// ## Parameters
    /// - `on_function_typed`: filled with a function expression's type as soon as its signature is known, before its
    ///   body is visited. Declarations use it so a function bound by `let` can call itself.
    pub(crate) fn resolve_expr_hooked(
        &mut self,
        expr: &Spanned<Expr>,
        on_function_typed: Option<&UnknownType>,
    ) -> Result<Ty, CompileError> {
        if let Some(ty) = self.info.types.get(&expr.id) {
            return Ok(ty.clone());
        }

        let ty = match &expr.node {
            Expr::Literal(literal) => self.literal_type(literal, expr.span)?,
            Expr::Group(inner) => self.resolve_expr_hooked(inner, on_function_typed)?,
            Expr::Binary(binary) => self.check_binary(binary, expr.span)?,
            Expr::Chain(chain) => self.resolve_chain(chain, expr.span)?,
            Expr::New(new) => self.check_new(new, expr.span)?,
            Expr::Function(function) => {
                if function.name.is_some() {
                    return Err(errors::invalid_expression(
                        "Function expression cannot have a name",
                        expr.span,
                    ));
                }
                if function.when.is_some() {
                    return Err(errors::invalid_expression(
                        "Function expression cannot have a `when` condition",
                        expr.span,
                    ));
                }
                self.check_function(function, expr.id, expr.span, None, on_function_typed)?
            }
        };

        self.record(expr.id, &ty);
        Ok(ty)
    }

    /// A literal is a value of the built-in type it names.
    pub(crate) fn literal_type(&mut self, literal: &Literal, span: Span) -> Result<Ty, CompileError> {
        let ty = self.scopes.get(&literal.type_name, span)?;
        if matches!(ty, Ty::Instance(_) | Ty::Unknown(_)) {
            return Err(errors::invalid_expression(
                &format!("Literal type '{}' is a value, not a type", literal.type_name),
                span,
            ));
        }
        Ok(Ty::instance(ty))
    }

    fn check_binary(&mut self, binary: &BinaryExpr, span: Span) -> Result<Ty, CompileError> {
        if binary.op.is_compound_assign() {
            return Err(errors::invalid_expression(
                "`+=` can only be used as a statement",
                span,
            ));
        }
        let ty = self.check_operands(binary)?;
        if binary.op.is_comparison() {
            return Ok(Ty::instance(self.scopes.builtin(types::BOOLEAN)?));
        }
        Ok(ty)
    }

    /// Both operands must be values of the same type; that type is returned.
    pub(crate) fn check_operands(&mut self, binary: &BinaryExpr) -> Result<Ty, CompileError> {
        let lhs = self.resolve_expr(&binary.lhs)?;
        let rhs = self.resolve_expr(&binary.rhs)?;
        if !lhs.is_instance() {
            return Err(errors::not_an_instance(lhs.describe(), binary.lhs.span));
        }
        if !rhs.is_instance() {
            return Err(errors::not_an_instance(rhs.describe(), binary.rhs.span));
        }
        if !lhs.equals(&rhs)? {
            return Err(errors::type_mismatch(&lhs, &rhs, binary.rhs.span)
                .with_note(format!("Both sides of `{}` must have the same type", binary.op)));
        }
        Ok(lhs)
    }

    // ========================================================================
    // Chains
    // ========================================================================

    /// Resolve `name` followed by calls and property accesses, left to right.
    pub(crate) fn resolve_chain(&mut self, chain: &Chain, span: Span) -> Result<Ty, CompileError> {
        let base = self.scopes.get(&chain.name, span)?;
        let mut current = base
            .known()
            .map_err(|_| errors::unresolved_type(&chain.name, span))?;

        for segment in &chain.segments {
            current = match &segment.node {
                ChainSegment::Call(args) => self.check_call(&current, args, segment.span)?,
                ChainSegment::Property(name) => self.check_property(&current, name, segment.span)?,
            };
        }
        Ok(current)
    }

    fn check_call(&mut self, callee: &Ty, args: &[Spanned<Expr>], span: Span) -> Result<Ty, CompileError> {
        let (params, ret) = match callee {
            Ty::Instance(inner) => match inner.known()? {
                Ty::Function(function) => (function.args.clone(), function.ret().cloned()),
                Ty::Multi(multi) => multi_signature(&multi),
                other => return Err(errors::not_callable(&other, span)),
            },
            // A multi family is called through its name, which is bound to the raw type.
            Ty::Multi(multi) => multi_signature(multi),
            other => return Err(errors::not_an_instance(other.describe(), span)),
        };

        if params.len() != args.len() {
            return Err(errors::arity_mismatch(params.len(), args.len(), span));
        }

        for (index, (arg, param)) in args.iter().zip(&params).enumerate() {
            let arg_ty = self.resolve_expr(arg)?;
            let Some(inner) = arg_ty.unbox() else {
                return Err(errors::not_an_instance(arg_ty.describe(), arg.span));
            };
            if !inner.equals(param)? {
                return Err(errors::argument_mismatch(index, param, inner, arg.span));
            }
        }

        let ret = ret.ok_or_else(|| errors::unresolved_return(span))?;
        Ok(Ty::instance(ret))
    }

    pub(crate) fn check_property(&mut self, current: &Ty, name: &str, span: Span) -> Result<Ty, CompileError> {
        let Ty::Instance(inner) = current else {
            return Err(errors::not_an_instance(current.describe(), span)
                .with_note("Properties can only be read from values"));
        };
        let Ty::Object(object) = inner.known()? else {
            return Err(errors::unknown_property(&**inner, name, span));
        };
        let property = object
            .property(name)
            .ok_or_else(|| errors::unknown_property(&object.name, name, span))?;
        Ok(Ty::instance(property))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// `new C(args)` selects the first registered initializer. Arguments are typed but not matched against it.
    fn check_new(&mut self, new: &NewExpr, span: Span) -> Result<Ty, CompileError> {
        let class = self.scopes.get(&new.class, span)?;
        let Ty::Object(object) = class.known()? else {
            return Err(errors::not_constructible(&new.class, class.describe(), span));
        };
        if object.initializers().first().is_none() {
            return Err(errors::no_initializer(&new.class, span));
        }
        for arg in &new.args {
            let arg_ty = self.resolve_expr(arg)?;
            if !arg_ty.is_instance() {
                return Err(errors::not_an_instance(arg_ty.describe(), arg.span));
            }
        }
        Ok(Ty::instance(Ty::Object(object)))
    }
}

fn multi_signature(multi: &types::MultiType) -> (Vec<Ty>, Option<Ty>) {
    let params = multi.params.iter().map(|(_, ty)| ty.clone()).collect();
    (params, Some(multi.ret.clone()))
}
