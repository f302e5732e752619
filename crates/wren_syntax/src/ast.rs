//! Abstract Syntax Tree definitions for Wren
//!
//! Statement and expression kinds are closed enums, so every visitor matches them exhaustively.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Identity of a syntax node.
///
/// Allocated once when a node is wrapped in [`Spanned`]. Clones keep the id, so a cloned subtree still names the same
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node with source location
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
    pub id: NodeId,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self {
            node,
            span,
            id: NodeId::fresh(),
        }
    }

    /// Wrap a node that has no source position (synthesized or test trees).
    pub fn dummy(node: T) -> Self {
        Self::new(node, Span::default())
    }
}

// Structural equality: two trees built from the same source compare equal even though their ids differ.
impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.span == other.span
    }
}

/// Identifier
pub type Ident = String;

// ============================================================================
// Type references
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Int`, `Point`
    Name(Ident),
    /// `(Int, Int) -> Boolean`; a missing return type means `Void`
    Function {
        args: Vec<Spanned<TypeExpr>>,
        ret: Option<Box<Spanned<TypeExpr>>>,
    },
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Function { args, ret } => {
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg.node)?;
                }
                write!(f, ")")?;
                if let Some(ret) = ret {
                    write!(f, " -> {}", ret.node)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Program structure
// ============================================================================

/// Root node: an ordered statement sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let x: T = e` / `var x = e`
    Decl(Decl),
    /// `a.b.c = e` / `a += e`
    Assign(PathAssign),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(Option<Spanned<Expr>>),
    /// A binary expression in statement position (only `+=` is legal there)
    Binary(BinaryExpr),
    /// A call/property chain in statement position
    Chain(Chain),
    /// Named function statement, optionally guarded with `when`
    Function(Function),
    Multi(MultiDecl),
    Class(ClassDecl),
    /// Property initializer; only legal inside a class body
    Init(InitDecl),
}

// ============================================================================
// Declarations and assignment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Var,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: Ident,
    pub ty: Option<Spanned<TypeExpr>>,
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
        }
    }
}

/// Assignment through a qualified path: `name.p1.p2 op value`
#[derive(Debug, Clone, PartialEq)]
pub struct PathAssign {
    pub name: Ident,
    pub path: Vec<Spanned<Ident>>,
    pub op: AssignOp,
    pub value: Spanned<Expr>,
}

// ============================================================================
// Control flow
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Spanned<Expr>,
    pub then_block: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub cond: Spanned<Expr>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Spanned<Expr>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Box<Spanned<Stmt>>,
    pub cond: Option<Spanned<Expr>>,
    pub after: Box<Spanned<Stmt>>,
    pub block: Block,
}

// ============================================================================
// Functions, multis, classes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Option<Spanned<TypeExpr>>,
    /// Default value used when the argument is absent at the call site
    pub default: Option<Spanned<Literal>>,
}

/// A function: named statement, anonymous expression, class method or multi implementor.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    pub ret: Option<Spanned<TypeExpr>>,
    pub body: Block,
    /// Dispatch guard for multi implementors
    pub when: Option<Box<Spanned<Expr>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiParam {
    pub name: Ident,
    pub ty: Spanned<TypeExpr>,
}

/// `multi name (a: T, b: U) -> R`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDecl {
    pub name: Ident,
    pub params: Vec<MultiParam>,
    pub ret: Option<Spanned<TypeExpr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitDecl {
    pub params: Vec<Param>,
    pub block: Block,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Parenthesized expression
    Group(Box<Spanned<Expr>>),
    Binary(BinaryExpr),
    Chain(Chain),
    New(NewExpr),
    /// Anonymous function expression
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Integer(v) => write!(f, "{}", v),
            LiteralValue::Float(v) => write!(f, "{}", v),
            LiteralValue::Str(v) => write!(f, "{}", v),
            LiteralValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

/// A literal and the name of the built-in type it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub type_name: Ident,
}

impl Literal {
    pub fn int(value: i64) -> Self {
        Self {
            value: LiteralValue::Integer(value),
            type_name: "Int".to_string(),
        }
    }

    pub fn float(value: f64) -> Self {
        Self {
            value: LiteralValue::Float(value),
            type_name: "Float".to_string(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: LiteralValue::Str(value.into()),
            type_name: "String".to_string(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            value: LiteralValue::Boolean(value),
            type_name: "Boolean".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    /// Compound increment `+=`, the only operator allowed in statement position
    AddAssign,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::AddAssign => "+=",
        }
    }

    /// Comparison operators produce a `Boolean` regardless of operand type.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq
        )
    }

    pub fn is_compound_assign(self) -> bool {
        matches!(self, BinaryOp::AddAssign)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Box<Spanned<Expr>>,
    pub op: BinaryOp,
    pub rhs: Box<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChainSegment {
    /// `(a, b)`
    Call(Vec<Spanned<Expr>>),
    /// `.name`
    Property(Ident),
}

/// `name` followed by calls and property accesses, resolved left to right
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub name: Ident,
    pub segments: Vec<Spanned<ChainSegment>>,
}

/// `new Name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub class: Ident,
    pub args: Vec<Spanned<Expr>>,
}
