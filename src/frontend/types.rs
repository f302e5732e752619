//! Type values produced by the checker.
//!
//! A [`Ty`] is either a raw type (`Int`, a class, a function signature, a multi family) or an [`Ty::Instance`] box
//! meaning "a value of that type". Expressions almost always have Instance types; scopes bind class names to raw
//! types and variables to Instances.
//!
//! ## Notes
//! - Object and Multi types compare by identity of their shared allocation. Everything else compares structurally.
//! - Comparing an Instance against a raw type is a checker bug and reports [`ErrorKind::Internal`].
//! - An [`UnknownType`] is a single-assignment cell. Reading it before it is filled is an
//!   [`ErrorKind::UnresolvedType`] error.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use wren_syntax::ast::NodeId;

use super::diagnostics::{CompileError, ErrorKind};

pub const OBJECT: &str = "Object";
pub const BOOLEAN: &str = "Boolean";
pub const VOID: &str = "Void";
pub const INT: &str = "Int";
pub const FLOAT: &str = "Float";
pub const STRING: &str = "String";

#[derive(Clone)]
pub enum Ty {
    /// Primitive-like built-in type, equal by name
    Named(Rc<str>),
    Object(Rc<ObjectType>),
    Function(Rc<FunctionType>),
    Multi(Rc<MultiType>),
    /// A value of the wrapped type
    Instance(Box<Ty>),
    /// Inference placeholder
    Unknown(Rc<UnknownType>),
}

impl Ty {
    pub fn named(name: &str) -> Ty {
        Ty::Named(Rc::from(name))
    }

    pub fn instance(ty: Ty) -> Ty {
        Ty::Instance(Box::new(ty))
    }

    pub fn unknown() -> Ty {
        Ty::Unknown(Rc::new(UnknownType::default()))
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, Ty::Instance(_))
    }

    /// The wrapped type of an Instance.
    pub fn unbox(&self) -> Option<&Ty> {
        match self {
            Ty::Instance(inner) => Some(inner),
            _ => None,
        }
    }

    /// Follow a filled Unknown to its backing type. Other types are returned unchanged.
    pub fn known(&self) -> Result<Ty, CompileError> {
        match self {
            Ty::Unknown(cell) => match cell.get() {
                Some(ty) => ty.known(),
                None => Err(unresolved()),
            },
            other => Ok(other.clone()),
        }
    }

    /// Structural equality, with identity for Object and Multi types.
    pub fn equals(&self, other: &Ty) -> Result<bool, CompileError> {
        match (self, other) {
            (Ty::Unknown(_), _) => self.known()?.equals(other),
            (_, Ty::Unknown(_)) => self.equals(&other.known()?),
            (Ty::Instance(a), Ty::Instance(b)) => a.equals(b),
            (Ty::Instance(_), _) | (_, Ty::Instance(_)) => Err(CompileError::internal(format!(
                "Cannot compare an instance with a raw type ('{}' vs '{}')",
                self.describe(),
                other.describe()
            ))),
            (Ty::Named(a), Ty::Named(b)) => Ok(a == b),
            (Ty::Object(a), Ty::Object(b)) => Ok(Rc::ptr_eq(a, b)),
            (Ty::Multi(a), Ty::Multi(b)) => Ok(Rc::ptr_eq(a, b)),
            (Ty::Function(a), Ty::Function(b)) => a.equals(b),
            _ => Ok(false),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, Ty::Named(n) if &**n == name)
    }

    /// Long form for messages that must distinguish values from types.
    pub fn describe(&self) -> String {
        match self {
            Ty::Instance(inner) => format!("a value of type '{}'", inner),
            Ty::Unknown(cell) => match cell.get() {
                Some(ty) => ty.describe(),
                None => "an unresolved type".to_string(),
            },
            other => format!("the type '{}'", other),
        }
    }
}

fn unresolved() -> CompileError {
    CompileError::unlocated(ErrorKind::UnresolvedType, "Type has not been inferred yet")
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Named(name) => write!(f, "{}", name),
            Ty::Object(object) => write!(f, "{}", object.name),
            Ty::Function(function) => write!(f, "{}", function),
            Ty::Multi(multi) => write!(f, "{}", multi),
            Ty::Instance(inner) => write!(f, "{}", inner),
            Ty::Unknown(cell) => match cell.get() {
                Some(ty) => write!(f, "{}", ty),
                None => write!(f, "?"),
            },
        }
    }
}

// Object types may refer to themselves through their properties, so Debug prints names only.
impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Instance(inner) => write!(f, "Instance({:?})", inner),
            Ty::Named(name) => write!(f, "Named({})", name),
            Ty::Object(object) => write!(f, "Object({})", object.name),
            Ty::Function(function) => write!(f, "Function({})", function),
            Ty::Multi(multi) => write!(f, "Multi({})", multi.name),
            Ty::Unknown(cell) => match cell.get() {
                Some(ty) => write!(f, "Unknown({:?})", ty),
                None => write!(f, "Unknown(?)"),
            },
        }
    }
}

/// Reduce a list of types to its structurally distinct members, keeping first occurrences.
///
/// Pairwise comparison, so quadratic in the list length.
pub fn distinct(types: &[Ty]) -> Result<Vec<Ty>, CompileError> {
    let mut unique: Vec<Ty> = Vec::new();
    for ty in types {
        let mut seen = false;
        for existing in &unique {
            if existing.equals(ty)? {
                seen = true;
                break;
            }
        }
        if !seen {
            unique.push(ty.clone());
        }
    }
    Ok(unique)
}

// ============================================================================
// Object types
// ============================================================================

/// A class: named properties in declaration order plus initializer signatures.
pub struct ObjectType {
    pub name: String,
    pub supertype: Option<Rc<ObjectType>>,
    properties: RefCell<Vec<(String, Ty)>>,
    initializers: RefCell<Vec<Rc<FunctionType>>>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, supertype: Option<Rc<ObjectType>>) -> Self {
        Self {
            name: name.into(),
            supertype,
            properties: RefCell::new(Vec::new()),
            initializers: RefCell::new(Vec::new()),
        }
    }

    /// Record a property. Returns `false` when the name is already taken on this type.
    pub fn define_property(&self, name: &str, ty: Ty) -> bool {
        let mut properties = self.properties.borrow_mut();
        if properties.iter().any(|(existing, _)| existing == name) {
            return false;
        }
        properties.push((name.to_string(), ty));
        true
    }

    /// Look a property up here, then along the supertype chain.
    pub fn property(&self, name: &str) -> Option<Ty> {
        let own = self
            .properties
            .borrow()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, ty)| ty.clone());
        own.or_else(|| self.supertype.as_ref().and_then(|s| s.property(name)))
    }

    pub fn properties(&self) -> Vec<(String, Ty)> {
        self.properties.borrow().clone()
    }

    pub fn add_initializer(&self, signature: Rc<FunctionType>) {
        self.initializers.borrow_mut().push(signature);
    }

    pub fn initializers(&self) -> Vec<Rc<FunctionType>> {
        self.initializers.borrow().clone()
    }

    pub fn initializer_with_arity(&self, arity: usize) -> Option<Rc<FunctionType>> {
        self.initializers.borrow().iter().find(|i| i.args.len() == arity).cloned()
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let properties: Vec<String> = self.properties.borrow().iter().map(|(name, _)| name.clone()).collect();
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("supertype", &self.supertype.as_ref().map(|s| s.name.clone()))
            .field("properties", &properties)
            .field("initializers", &self.initializers.borrow().len())
            .finish()
    }
}

// ============================================================================
// Function types
// ============================================================================

pub struct FunctionType {
    pub args: Vec<Ty>,
    ret: OnceCell<Ty>,
}

impl FunctionType {
    pub fn new(args: Vec<Ty>, ret: Option<Ty>) -> Self {
        let cell = OnceCell::new();
        if let Some(ret) = ret {
            let _ = cell.set(ret);
        }
        Self { args, ret: cell }
    }

    /// The return type, once declared or inferred.
    pub fn ret(&self) -> Option<&Ty> {
        self.ret.get()
    }

    /// Fill in an inferred return type. The cell can only be written once.
    pub fn set_ret(&self, ty: Ty) -> Result<(), CompileError> {
        self.ret
            .set(ty)
            .map_err(|ty| CompileError::internal(format!("Function return type already set (tried '{}')", ty)))
    }

    pub fn equals(&self, other: &FunctionType) -> Result<bool, CompileError> {
        if self.args.len() != other.args.len() {
            return Ok(false);
        }
        for (a, b) in self.args.iter().zip(&other.args) {
            if !a.equals(b)? {
                return Ok(false);
            }
        }
        match (self.ret(), other.ret()) {
            (Some(a), Some(b)) => a.equals(b),
            _ => Err(unresolved()),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        match self.ret() {
            Some(ret) => write!(f, ") -> {}", ret),
            None => write!(f, ") -> ?"),
        }
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionType{}", self)
    }
}

// ============================================================================
// Multi types
// ============================================================================

/// A function registered as one implementation of a multi family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementor {
    pub function: NodeId,
    /// `<multi>_<ordinal>`, 1-based in registration order
    pub name: String,
    pub guarded: bool,
}

pub struct MultiType {
    pub name: String,
    pub params: Vec<(String, Ty)>,
    pub ret: Ty,
    implementors: RefCell<Vec<Implementor>>,
}

impl MultiType {
    pub fn new(name: impl Into<String>, params: Vec<(String, Ty)>, ret: Ty) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
            implementors: RefCell::new(Vec::new()),
        }
    }

    /// Append an implementor and return its synthesized name.
    pub fn add_implementor(&self, function: NodeId, guarded: bool) -> String {
        let mut implementors = self.implementors.borrow_mut();
        let name = format!("{}_{}", self.name, implementors.len() + 1);
        implementors.push(Implementor {
            function,
            name: name.clone(),
            guarded,
        });
        name
    }

    pub fn implementors(&self) -> Vec<Implementor> {
        self.implementors.borrow().clone()
    }
}

impl fmt::Display for MultiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multi {}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

impl fmt::Debug for MultiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiType")
            .field("name", &self.name)
            .field("implementors", &self.implementors.borrow())
            .finish()
    }
}

// ============================================================================
// Unknown
// ============================================================================

#[derive(Debug, Default)]
pub struct UnknownType {
    known: OnceCell<Ty>,
}

impl UnknownType {
    pub fn get(&self) -> Option<&Ty> {
        self.known.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.known.get().is_some()
    }

    pub fn resolve(&self, ty: Ty) -> Result<(), CompileError> {
        self.known
            .set(ty)
            .map_err(|ty| CompileError::internal(format!("Unknown type already resolved (tried '{}')", ty)))
    }
}
