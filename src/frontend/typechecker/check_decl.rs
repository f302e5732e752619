//! Declarations: `let`/`var`, functions and return-type inference, `multi` families, classes.

use std::rc::Rc;

use wren_syntax::ast::*;

use super::{MultiIndex, MultiMember, TypeChecker};
use crate::frontend::diagnostics::{CompileError, Warning, errors};
use crate::frontend::scope::ScopeKind;
use crate::frontend::types::{self, FunctionType, MultiType, ObjectType, Ty, UnknownType};

/// Parameter and return types a multi implementor takes from its family.
pub(crate) struct Inherited<'a> {
    pub params: &'a [Ty],
    pub ret: &'a Ty,
}

impl TypeChecker {
    // ========================================================================
    // let / var
    // ========================================================================

    pub(crate) fn check_decl(&mut self, decl: &Decl, id: NodeId, span: Span) -> Result<(), CompileError> {
        let declared = match &decl.ty {
            Some(ty) => Some(Ty::instance(self.resolve_type_expr(ty)?)),
            None => None,
        };

        let Some(value) = &decl.value else {
            let ty = declared.unwrap_or_else(Ty::unknown);
            self.scopes.set_local(&decl.name, ty.clone())?;
            self.record(id, &ty);
            return Ok(());
        };

        // The initializer sees the binding itself, so function values can recurse.
        let binding = declared.clone().unwrap_or_else(Ty::unknown);
        let value_ty = self.in_scope(ScopeKind::Declaration, |this| {
            this.scopes.set_local(&decl.name, binding.clone())?;
            let hook: Option<&UnknownType> = match &binding {
                Ty::Unknown(cell) => Some(&**cell),
                _ => None,
            };
            this.resolve_expr_hooked(value, hook)
        })?;

        if !value_ty.is_instance() {
            return Err(errors::not_an_instance(value_ty.describe(), value.span));
        }

        let bound = match declared {
            Some(declared) => {
                if !declared.equals(&value_ty)? {
                    return Err(errors::type_mismatch(&declared, &value_ty, value.span)
                        .with_note(format!("'{}' is declared as '{}'", decl.name, declared)));
                }
                declared
            }
            None => {
                if let Ty::Unknown(cell) = &binding {
                    if !cell.is_resolved() {
                        cell.resolve(value_ty.clone())?;
                    }
                }
                value_ty
            }
        };

        self.scopes.set_local(&decl.name, bound.clone())?;
        self.record(id, &bound);
        Ok(())
    }

    /// Resolve a type annotation to a raw type.
    pub(crate) fn resolve_type_expr(&mut self, ty: &Spanned<TypeExpr>) -> Result<Ty, CompileError> {
        match &ty.node {
            TypeExpr::Name(name) => {
                let resolved = self.scopes.get(name, ty.span)?;
                if matches!(resolved, Ty::Instance(_) | Ty::Unknown(_)) {
                    return Err(errors::invalid_expression(
                        &format!("'{}' is a value, not a type", name),
                        ty.span,
                    ));
                }
                Ok(resolved)
            }
            TypeExpr::Function { args, ret } => {
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args {
                    arg_types.push(self.resolve_type_expr(arg)?);
                }
                let ret = match ret {
                    Some(ret) => self.resolve_type_expr(ret)?,
                    None => self.scopes.builtin(types::VOID)?,
                };
                Ok(Ty::Function(Rc::new(FunctionType::new(arg_types, Some(ret)))))
            }
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Type a function once, memoized by node.
    ///
    /// The function's `Instance(Function)` type is recorded (and `on_typed` is filled) before the body is visited.
    pub(crate) fn check_function(
        &mut self,
        function: &Function,
        id: NodeId,
        span: Span,
        inherited: Option<&Inherited<'_>>,
        on_typed: Option<&UnknownType>,
    ) -> Result<Ty, CompileError> {
        if let Some(ty) = self.info.types.get(&id) {
            return Ok(ty.clone());
        }

        let (signature, declared_ret) = self.function_signature(function, span, inherited)?;
        let ty = Ty::instance(Ty::Function(signature.clone()));
        self.record(id, &ty);
        if let Some(cell) = on_typed {
            cell.resolve(ty.clone())?;
        }

        self.check_function_body(function, &signature, declared_ret.as_ref(), span)?;
        Ok(ty)
    }

    fn function_signature(
        &mut self,
        function: &Function,
        span: Span,
        inherited: Option<&Inherited<'_>>,
    ) -> Result<(Rc<FunctionType>, Option<Ty>), CompileError> {
        let declared_ret = match (&function.ret, inherited) {
            (Some(ret), _) => Some(self.resolve_type_expr(ret)?),
            (None, Some(inherited)) => Some(inherited.ret.clone()),
            (None, None) => None,
        };
        let params = self.resolve_params(&function.params, inherited.map(|i| i.params), span)?;
        let signature = Rc::new(FunctionType::new(params, declared_ret.clone()));
        Ok((signature, declared_ret))
    }

    fn check_function_body(
        &mut self,
        function: &Function,
        signature: &Rc<FunctionType>,
        declared_ret: Option<&Ty>,
        span: Span,
    ) -> Result<(), CompileError> {
        let returns = self.in_scope(ScopeKind::Function, |this| {
            this.bind_params(&function.params, &signature.args)?;
            this.check_statements(&function.body.statements)
        })?;
        self.unify_returns(signature, declared_ret, returns.into_all(), span)
    }

    /// Parameter types: declared, else inherited by position, else an error. Literal defaults must match.
    pub(crate) fn resolve_params(
        &mut self,
        params: &[Param],
        inherited: Option<&[Ty]>,
        span: Span,
    ) -> Result<Vec<Ty>, CompileError> {
        let mut resolved = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            let ty = match (&param.ty, inherited.and_then(|tys| tys.get(index))) {
                (Some(ty), _) => self.resolve_type_expr(ty)?,
                (None, Some(ty)) => ty.clone(),
                (None, None) => {
                    return Err(errors::missing_annotation(&format!("parameter '{}'", param.name), span));
                }
            };

            if let Some(default) = &param.default {
                let default_ty = self.literal_type(&default.node, default.span)?;
                if !default_ty.equals(&Ty::instance(ty.clone()))? {
                    return Err(errors::type_mismatch(&ty, &default_ty, default.span)
                        .with_note(format!("Default value of '{}' must match its type", param.name)));
                }
            }
            resolved.push(ty);
        }
        Ok(resolved)
    }

    fn bind_params(&mut self, params: &[Param], types: &[Ty]) -> Result<(), CompileError> {
        for (param, ty) in params.iter().zip(types) {
            self.scopes.set_local(&param.name, Ty::instance(ty.clone()))?;
        }
        Ok(())
    }

    /// Check collected returns against the declared type, or infer the return type from them.
    fn unify_returns(
        &mut self,
        signature: &FunctionType,
        declared_ret: Option<&Ty>,
        returns: Vec<(Ty, Span)>,
        span: Span,
    ) -> Result<(), CompileError> {
        if let Some(declared) = declared_ret {
            for (ty, return_span) in &returns {
                if !ty.equals(declared)? {
                    return Err(errors::return_type_mismatch(declared, ty, *return_span));
                }
            }
            return Ok(());
        }

        if returns.len() > self.config.return_warning_threshold {
            self.warn(Warning::new(
                format!(
                    "Function has {} return statements; inferring its return type compares them pairwise",
                    returns.len()
                ),
                span,
            ));
        }

        let candidates: Vec<Ty> = returns.into_iter().map(|(ty, _)| ty).collect();
        let unique = types::distinct(&candidates)?;
        match unique.as_slice() {
            [] => signature.set_ret(self.scopes.builtin(types::VOID)?),
            [single] => signature.set_ret(single.clone()),
            many => {
                let names: Vec<String> = many.iter().map(|ty| ty.to_string()).collect();
                Err(errors::too_many_return_types(&names, span))
            }
        }
    }

    /// A named function statement: always an implementor of a `multi` in the same block.
    pub(crate) fn check_function_stmt(
        &mut self,
        function: &Function,
        id: NodeId,
        span: Span,
        multis: &MultiIndex<'_>,
    ) -> Result<(), CompileError> {
        let Some(name) = function.name.as_deref() else {
            return Err(errors::invalid_statement("Function statement must have a name", span));
        };
        if self.info.types.contains_key(&id) {
            return Ok(());
        }
        let Some(&(multi_id, multi_span, decl)) = multis.get(name) else {
            return Err(errors::no_associated_multi(name, span));
        };
        let multi = self.multi_type(decl, multi_id, multi_span)?;

        if function.params.len() != multi.params.len() {
            return Err(errors::arity_mismatch(multi.params.len(), function.params.len(), span)
                .with_note(format!("Implementations of multi '{}' take its parameters", name)));
        }
        let param_types: Vec<Ty> = multi.params.iter().map(|(_, ty)| ty.clone()).collect();
        for (param, expected) in function.params.iter().zip(&param_types) {
            if let Some(ty_expr) = &param.ty {
                let ty = self.resolve_type_expr(ty_expr)?;
                if !ty.equals(expected)? {
                    return Err(errors::type_mismatch(expected, &ty, ty_expr.span));
                }
            }
        }
        if let Some(ret_expr) = &function.ret {
            let ret = self.resolve_type_expr(ret_expr)?;
            if !ret.equals(&multi.ret)? {
                return Err(errors::return_type_mismatch(&multi.ret, &ret, ret_expr.span));
            }
        }

        let guarded = function.when.is_some();
        let member = multi.add_implementor(id, guarded);
        tracing::debug!(multi = %multi.name, implementor = %member, guarded, "registered multi implementor");
        self.info.multi_members.insert(
            id,
            MultiMember {
                multi: multi.clone(),
                name: member,
            },
        );

        let inherited = Inherited {
            params: &param_types,
            ret: &multi.ret,
        };
        self.check_function(function, id, span, Some(&inherited), None)?;
        if let Some(guard) = &function.when {
            self.check_guard(&multi, guard)?;
        }
        Ok(())
    }

    /// Guards run in the dispatcher, so they see the multi's parameters under the multi's names.
    fn check_guard(&mut self, multi: &MultiType, guard: &Spanned<Expr>) -> Result<(), CompileError> {
        self.in_scope(ScopeKind::Function, |this| {
            for (name, ty) in &multi.params {
                this.scopes.set_local(name, Ty::instance(ty.clone()))?;
            }
            let guard_ty = this.resolve_expr(guard)?;
            let boolean = Ty::instance(this.scopes.builtin(types::BOOLEAN)?);
            if !guard_ty.is_instance() || !guard_ty.equals(&boolean)? {
                return Err(errors::type_mismatch(&boolean, &guard_ty, guard.span)
                    .with_note("A `when` guard must be a Boolean"));
            }
            Ok(())
        })
    }

    // ========================================================================
    // multi
    // ========================================================================

    /// The family type for a `multi` declaration, built on first use.
    fn multi_type(&mut self, decl: &MultiDecl, id: NodeId, span: Span) -> Result<Rc<MultiType>, CompileError> {
        if let Some(multi) = self.info.multis.get(&id) {
            return Ok(multi.clone());
        }

        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            params.push((param.name.clone(), self.resolve_type_expr(&param.ty)?));
        }
        let Some(ret) = &decl.ret else {
            return Err(errors::missing_annotation(
                &format!("the return type of multi '{}'", decl.name),
                span,
            ));
        };
        let ret = self.resolve_type_expr(ret)?;

        let multi = Rc::new(MultiType::new(decl.name.clone(), params, ret));
        self.info.multis.insert(id, multi.clone());
        Ok(multi)
    }

    pub(crate) fn check_multi(&mut self, decl: &MultiDecl, id: NodeId, span: Span) -> Result<(), CompileError> {
        let multi = self.multi_type(decl, id, span)?;
        let ty = Ty::Multi(multi);
        self.scopes.set_local(&decl.name, ty.clone())?;
        self.record(id, &ty);
        Ok(())
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Properties are recorded first, then method signatures, then initializers, then method bodies. Members can
    /// therefore refer to each other regardless of declaration order.
    pub(crate) fn check_class(&mut self, decl: &ClassDecl, id: NodeId, span: Span) -> Result<(), CompileError> {
        if self.info.classes.contains_key(&id) {
            return Ok(());
        }
        tracing::debug!(class = %decl.name, start = span.start, members = decl.body.statements.len(), "checking class");

        for stmt in &decl.body.statements {
            if !matches!(stmt.node, Stmt::Decl(_) | Stmt::Function(_) | Stmt::Init(_)) {
                return Err(errors::invalid_statement(
                    "Only properties, methods and initializers are allowed in a class body",
                    stmt.span,
                ));
            }
        }

        let object = Rc::new(ObjectType::new(decl.name.clone(), Some(self.scopes.root_object())));
        let class_ty = Ty::Object(object.clone());
        // Bound before the body so members can name the class.
        self.scopes.set_local(&decl.name, class_ty.clone())?;
        self.info.classes.insert(id, object.clone());
        self.record(id, &class_ty);

        let statements = &decl.body.statements;
        self.in_scope(ScopeKind::Class, |this| {
            this.in_scope(ScopeKind::This, |this| {
                this.scopes.set_local("this", Ty::instance(class_ty.clone()))?;

                for stmt in statements {
                    if let Stmt::Decl(property) = &stmt.node {
                        this.check_property_decl(&object, property, stmt.id, stmt.span)?;
                    }
                }
                let mut methods = Vec::new();
                for stmt in statements {
                    if let Stmt::Function(function) = &stmt.node {
                        let signature = this.register_method(&object, function, stmt.id, stmt.span)?;
                        methods.push((function, signature, stmt.span));
                    }
                }
                for stmt in statements {
                    if let Stmt::Init(init) = &stmt.node {
                        this.check_init(&object, init, stmt.id, stmt.span)?;
                    }
                }
                for (function, (signature, declared_ret), method_span) in methods {
                    this.check_function_body(function, &signature, declared_ret.as_ref(), method_span)?;
                }
                Ok(())
            })
        })
    }

    fn check_property_decl(
        &mut self,
        object: &ObjectType,
        decl: &Decl,
        id: NodeId,
        span: Span,
    ) -> Result<(), CompileError> {
        let Some(ty_expr) = &decl.ty else {
            return Err(errors::missing_annotation(&format!("property '{}'", decl.name), span)
                .with_note("Class properties must declare their type"));
        };
        let ty = self.resolve_type_expr(ty_expr)?;

        if let Some(value) = &decl.value {
            let Expr::Literal(literal) = &value.node else {
                return Err(errors::non_literal_default(&decl.name, value.span));
            };
            let value_ty = self.literal_type(literal, value.span)?;
            self.record(value.id, &value_ty);
            if !value_ty.equals(&Ty::instance(ty.clone()))? {
                return Err(errors::type_mismatch(&ty, &value_ty, value.span));
            }
        }

        if !object.define_property(&decl.name, ty.clone()) {
            return Err(errors::duplicate_property(&object.name, &decl.name, span));
        }
        self.record(id, &Ty::instance(ty));
        Ok(())
    }

    fn check_init(&mut self, object: &ObjectType, init: &InitDecl, id: NodeId, span: Span) -> Result<(), CompileError> {
        let params = self.resolve_params(&init.params, None, span)?;
        if object.initializer_with_arity(params.len()).is_some() {
            return Err(errors::initializer_collision(&object.name, params.len(), span));
        }

        let void = self.scopes.builtin(types::VOID)?;
        let signature = Rc::new(FunctionType::new(params, Some(void.clone())));
        object.add_initializer(signature.clone());
        self.record(id, &Ty::instance(Ty::Function(signature.clone())));

        let returns = self.in_scope(ScopeKind::Init, |this| {
            this.bind_params(&init.params, &signature.args)?;
            this.check_statements(&init.block.statements)
        })?;
        self.unify_returns(&signature, Some(&void), returns.into_all(), span)
    }

    /// Record a method's signature as a property so other members can call it.
    fn register_method(
        &mut self,
        object: &ObjectType,
        function: &Function,
        id: NodeId,
        span: Span,
    ) -> Result<(Rc<FunctionType>, Option<Ty>), CompileError> {
        let Some(name) = function.name.as_deref() else {
            return Err(errors::invalid_statement("Methods must have a name", span));
        };
        if function.when.is_some() {
            return Err(errors::invalid_statement("Methods cannot have a `when` guard", span));
        }

        let (signature, declared_ret) = self.function_signature(function, span, None)?;
        let raw = Ty::Function(signature.clone());
        if !object.define_property(name, raw.clone()) {
            return Err(errors::duplicate_property(&object.name, name, span));
        }
        self.record(id, &Ty::instance(raw));
        Ok((signature, declared_ret))
    }
}
