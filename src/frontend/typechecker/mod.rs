//! Type checker for the Wren programming language.
//!
//! Walks a parsed [`Program`] depth-first, resolving every name through a [`ScopeTable`], inferring the type of every
//! expression and declaration, and grouping multi implementors under their family.
//!
//! ## Notes
//!
//! - **Fail fast**: the first error aborts the walk. The only non-fatal diagnostic is the return-count
//!   [`Warning`](crate::frontend::diagnostics::Warning).
//! - **Side table, not tree mutation**: results are recorded in [`TypeCheckInfo`], keyed by [`NodeId`]. A node's entry
//!   is written once; resolving an already-typed node returns the recorded type without visiting it again.
//! - **Block results**: each block visit returns a [`BlockReturns`] value with the types of the `return`s it owns and
//!   the ones surfaced by nested `if`/`while`/`for` bodies. Function return inference folds over it.
//! - **Multi lookup**: before visiting a block, its `multi` declarations are indexed by name, so a function statement
//!   finds its family in one lookup.
//!
//! ## Examples
//!
//! ```
//! use wren::frontend::typechecker::TypeChecker;
//! use wren_syntax::build::*;
//!
//! let program = program(vec![let_("x", None, Some(int(1))), let_("y", Some("Int"), Some(ident("x")))]);
//! let mut checker = TypeChecker::new();
//! checker.check_program(&program).unwrap();
//! ```
//!
//! ## See also
//!
//! - [`scope`](super::scope) – scope chain and built-ins
//! - [`types`](super::types) – the type values recorded here

mod check_decl;
mod check_expr;
mod check_stmt;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::rc::Rc;

use wren_syntax::ast::*;

use crate::config::CheckerConfig;
use crate::frontend::diagnostics::{CompileError, Warning};
use crate::frontend::scope::{ScopeKind, ScopeTable};
use crate::frontend::types::{MultiType, ObjectType, Ty};

/// Typechecking output consumed by the code generator.
///
/// The code generator reads the tree plus this table and never re-derives types.
#[derive(Debug, Default, Clone)]
pub struct TypeCheckInfo {
    /// Resolved type per node: expressions, declarations, functions, multis, classes.
    pub types: HashMap<NodeId, Ty>,
    /// Multi family per `multi` declaration node.
    pub multis: HashMap<NodeId, Rc<MultiType>>,
    /// Function statements registered as multi implementors.
    pub multi_members: HashMap<NodeId, MultiMember>,
    /// Object type per class declaration node.
    pub classes: HashMap<NodeId, Rc<ObjectType>>,
}

/// Back-reference from an implementing function to its family.
#[derive(Debug, Clone)]
pub struct MultiMember {
    pub multi: Rc<MultiType>,
    /// Synthesized `<multi>_<ordinal>` name
    pub name: String,
}

impl TypeCheckInfo {
    pub fn node_type(&self, id: NodeId) -> Option<&Ty> {
        self.types.get(&id)
    }

    pub fn multi_type(&self, id: NodeId) -> Option<&Rc<MultiType>> {
        self.multis.get(&id)
    }

    pub fn multi_member(&self, id: NodeId) -> Option<&MultiMember> {
        self.multi_members.get(&id)
    }

    /// True for function statements that are emitted as part of their multi.
    pub fn is_multi_member(&self, id: NodeId) -> bool {
        self.multi_members.contains_key(&id)
    }

    pub fn class_type(&self, id: NodeId) -> Option<&Rc<ObjectType>> {
        self.classes.get(&id)
    }
}

/// Return types collected while visiting one block.
#[derive(Debug, Default)]
pub(crate) struct BlockReturns {
    /// The block's own `return`, at most one
    direct: Option<(Ty, Span)>,
    /// Returns surfaced from nested control-flow bodies, in visit order
    nested: Vec<(Ty, Span)>,
}

impl BlockReturns {
    fn absorb(&mut self, inner: BlockReturns) {
        self.nested.extend(inner.into_all());
    }

    /// Every collected return type, duplicates included.
    pub(crate) fn into_all(self) -> Vec<(Ty, Span)> {
        self.direct.into_iter().chain(self.nested).collect()
    }
}

/// `multi` declarations of one block, by name.
pub(crate) type MultiIndex<'a> = HashMap<&'a str, (NodeId, Span, &'a MultiDecl)>;

fn index_multis(statements: &[Spanned<Stmt>]) -> MultiIndex<'_> {
    statements
        .iter()
        .filter_map(|stmt| match &stmt.node {
            Stmt::Multi(decl) => Some((decl.name.as_str(), (stmt.id, stmt.span, decl))),
            _ => None,
        })
        .collect()
}

/// Type checker state.
///
/// Create with [`TypeChecker::new`], then call [`check_program`](Self::check_program) and hand
/// [`type_info`](Self::type_info) to the code generator.
pub struct TypeChecker {
    pub(crate) scopes: ScopeTable,
    pub(crate) config: CheckerConfig,
    pub(crate) info: TypeCheckInfo,
    pub(crate) warnings: Vec<Warning>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::with_scopes(ScopeTable::new())
    }

    /// Check against a root scope seeded by the caller.
    pub fn with_scopes(scopes: ScopeTable) -> Self {
        Self {
            scopes,
            config: CheckerConfig::default(),
            info: TypeCheckInfo::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    /// Check a whole program in a fresh top-level scope.
    #[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
    pub fn check_program(&mut self, program: &Program) -> Result<(), CompileError> {
        self.in_scope(ScopeKind::Program, |this| this.check_statements(&program.statements))?;
        tracing::debug!(
            nodes = self.info.types.len(),
            multis = self.info.multis.len(),
            classes = self.info.classes.len(),
            "type check finished"
        );
        Ok(())
    }

    /// Resolve one expression in the current scope. Already-typed nodes return their recorded type.
    pub fn resolve_expression(&mut self, expr: &Spanned<Expr>) -> Result<Ty, CompileError> {
        self.resolve_expr(expr)
    }

    /// Return accumulated type information for the code generator.
    pub fn type_info(&self) -> &TypeCheckInfo {
        &self.info
    }

    pub fn into_type_info(self) -> TypeCheckInfo {
        self.info
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Run `f` inside a new scope, discarding the scope afterwards even when `f` fails.
    pub(crate) fn in_scope<T>(
        &mut self,
        kind: ScopeKind,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        self.scopes.enter_scope(kind);
        tracing::trace!(kind = ?self.scopes.current_scope_kind(), depth = self.scopes.depth(), "entered scope");
        let result = f(self);
        self.scopes.exit_scope();
        result
    }

    /// Record a node's type. The first recorded type wins.
    pub(crate) fn record(&mut self, id: NodeId, ty: &Ty) {
        self.info.types.entry(id).or_insert_with(|| ty.clone());
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        tracing::warn!(message = %warning.message, "type check warning");
        self.warnings.push(warning);
    }

    pub(crate) fn check_block(&mut self, block: &Block, kind: ScopeKind) -> Result<BlockReturns, CompileError> {
        self.in_scope(kind, |this| this.check_statements(&block.statements))
    }

    /// Visit statements in the current scope.
    pub(crate) fn check_statements(&mut self, statements: &[Spanned<Stmt>]) -> Result<BlockReturns, CompileError> {
        let multis = index_multis(statements);
        let mut returns = BlockReturns::default();
        for stmt in statements {
            self.check_stmt(stmt, &multis, &mut returns)?;
        }
        Ok(returns)
    }
}
