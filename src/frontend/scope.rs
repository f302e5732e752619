//! Lexical scopes for Wren
//!
//! A stack of scopes linked by parent index. Lookup walks from the current scope out to the root. The root holds the
//! built-in types and is closed to ordinary definitions.

use std::collections::HashMap;
use std::rc::Rc;

use wren_syntax::ast::Span;

use super::diagnostics::{CompileError, errors};
use super::types::{self, ObjectType, Ty};

pub type ScopeId = usize;

/// Id of the root scope holding the built-ins.
pub const ROOT_SCOPE: ScopeId = 0;

/// Scope table managing every name visible to the checker
#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    current_scope: ScopeId,
    root_object: Rc<ObjectType>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// A table whose root holds `Object`, `Boolean`, `Void`, `Int`, `Float` and `String`.
    pub fn new() -> Self {
        Self::with_builtins(std::iter::empty())
    }

    /// Like [`ScopeTable::new`], plus extra intrinsic bindings supplied by the embedding harness.
    pub fn with_builtins(extra: impl IntoIterator<Item = (String, Ty)>) -> Self {
        let root_object = Rc::new(ObjectType::new(types::OBJECT, None));
        let mut root = Scope::new(None, ScopeKind::Root);
        root.bindings.insert(types::OBJECT.to_string(), Ty::Object(root_object.clone()));
        for name in [types::BOOLEAN, types::VOID, types::INT, types::FLOAT, types::STRING] {
            root.bindings.insert(name.to_string(), Ty::named(name));
        }
        for (name, ty) in extra {
            root.bindings.insert(name, ty);
        }

        Self {
            scopes: vec![root],
            current_scope: ROOT_SCOPE,
            root_object,
        }
    }

    /// The implicit supertype of every class.
    pub fn root_object(&self) -> Rc<ObjectType> {
        self.root_object.clone()
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self, kind: ScopeKind) {
        let new_scope = Scope::new(Some(self.current_scope), kind);
        self.scopes.push(new_scope);
        self.current_scope = self.scopes.len() - 1;
    }

    /// Exit and discard the current scope
    pub fn exit_scope(&mut self) {
        if self.current_scope == ROOT_SCOPE {
            return;
        }
        if let Some(scope) = self.scopes.pop() {
            self.current_scope = scope.parent.unwrap_or(ROOT_SCOPE);
        }
    }

    /// Bind `name` in the current scope, shadowing outer bindings.
    pub fn set_local(&mut self, name: &str, ty: Ty) -> Result<(), CompileError> {
        if self.current_scope == ROOT_SCOPE {
            return Err(CompileError::internal(format!(
                "Cannot define '{}' in the root scope",
                name
            )));
        }
        self.scopes[self.current_scope].bindings.insert(name.to_string(), ty);
        Ok(())
    }

    /// Resolve `name` through the scope chain, failing with a name error at `span`.
    pub fn get(&self, name: &str, span: Span) -> Result<Ty, CompileError> {
        self.lookup(name).ok_or_else(|| errors::unknown_symbol(name, span))
    }

    /// Look up a name in the current scope chain
    pub fn lookup(&self, name: &str) -> Option<Ty> {
        let scope = self.find_scope_for_name(name)?;
        self.scopes[scope].bindings.get(name).cloned()
    }

    /// The innermost scope binding `name`, if any.
    pub fn find_scope_for_name(&self, name: &str) -> Option<ScopeId> {
        let mut scope_idx = self.current_scope;
        loop {
            if self.scopes[scope_idx].bindings.contains_key(name) {
                return Some(scope_idx);
            }
            scope_idx = self.scopes[scope_idx].parent?;
        }
    }

    /// The binding of `name` in one particular scope.
    pub fn binding_in(&self, scope: ScopeId, name: &str) -> Option<Ty> {
        self.scopes.get(scope)?.bindings.get(name).cloned()
    }

    /// A built-in type from the root scope. A missing one means the bootstrap was incomplete.
    pub fn builtin(&self, name: &str) -> Result<Ty, CompileError> {
        self.binding_in(ROOT_SCOPE, name)
            .ok_or_else(|| CompileError::internal(format!("Root scope is missing built-in type '{}'", name)))
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Get the current scope kind
    pub fn current_scope_kind(&self) -> ScopeKind {
        self.scopes[self.current_scope].kind
    }

    /// Number of live scopes, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// A scope containing name bindings
#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub bindings: HashMap<String, Ty>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            bindings: HashMap::new(),
        }
    }
}

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Program,
    Block,
    /// Holds a declaration's own name while its initializer is checked
    Declaration,
    ForHeader,
    Function,
    Class,
    /// Binds `this` inside a class body
    This,
    Init,
}
