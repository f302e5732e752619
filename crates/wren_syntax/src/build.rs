//! Constructors for syntax trees without source positions.
//!
//! Every helper wraps its node with [`Spanned::dummy`], so each call allocates a fresh [`NodeId`](crate::ast::NodeId).

use crate::ast::*;

pub fn program(statements: Vec<Spanned<Stmt>>) -> Program {
    Program { statements }
}

pub fn block(statements: Vec<Spanned<Stmt>>) -> Block {
    Block { statements }
}

// ============================================================================
// Types
// ============================================================================

pub fn ty(name: &str) -> Spanned<TypeExpr> {
    Spanned::dummy(TypeExpr::Name(name.to_string()))
}

pub fn fn_ty(args: &[&str], ret: Option<&str>) -> Spanned<TypeExpr> {
    Spanned::dummy(TypeExpr::Function {
        args: args.iter().map(|a| ty(a)).collect(),
        ret: ret.map(|r| Box::new(ty(r))),
    })
}

// ============================================================================
// Expressions
// ============================================================================

pub fn lit(literal: Literal) -> Spanned<Expr> {
    Spanned::dummy(Expr::Literal(literal))
}

pub fn int(value: i64) -> Spanned<Expr> {
    lit(Literal::int(value))
}

pub fn float(value: f64) -> Spanned<Expr> {
    lit(Literal::float(value))
}

pub fn string(value: &str) -> Spanned<Expr> {
    lit(Literal::string(value))
}

pub fn boolean(value: bool) -> Spanned<Expr> {
    lit(Literal::boolean(value))
}

/// A bare name read: a chain with no segments.
pub fn ident(name: &str) -> Spanned<Expr> {
    chain(name, vec![])
}

pub fn chain(name: &str, segments: Vec<ChainSegment>) -> Spanned<Expr> {
    Spanned::dummy(Expr::Chain(Chain {
        name: name.to_string(),
        segments: segments.into_iter().map(Spanned::dummy).collect(),
    }))
}

pub fn call(name: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
    chain(name, vec![ChainSegment::Call(args)])
}

pub fn prop(name: &str) -> ChainSegment {
    ChainSegment::Property(name.to_string())
}

pub fn args(args: Vec<Spanned<Expr>>) -> ChainSegment {
    ChainSegment::Call(args)
}

pub fn binary(lhs: Spanned<Expr>, op: BinaryOp, rhs: Spanned<Expr>) -> Spanned<Expr> {
    Spanned::dummy(Expr::Binary(BinaryExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }))
}

pub fn group(inner: Spanned<Expr>) -> Spanned<Expr> {
    Spanned::dummy(Expr::Group(Box::new(inner)))
}

pub fn new_(class: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
    Spanned::dummy(Expr::New(NewExpr {
        class: class.to_string(),
        args,
    }))
}

pub fn function_expr(function: Function) -> Spanned<Expr> {
    Spanned::dummy(Expr::Function(function))
}

// ============================================================================
// Functions
// ============================================================================

pub fn param(name: &str, ty_name: Option<&str>) -> Param {
    Param {
        name: name.to_string(),
        ty: ty_name.map(ty),
        default: None,
    }
}

pub fn param_with_default(name: &str, ty_name: Option<&str>, default: Literal) -> Param {
    Param {
        default: Some(Spanned::dummy(default)),
        ..param(name, ty_name)
    }
}

/// An anonymous function.
pub fn func(params: Vec<Param>, ret: Option<&str>, body: Vec<Spanned<Stmt>>) -> Function {
    Function {
        name: None,
        params,
        ret: ret.map(ty),
        body: block(body),
        when: None,
    }
}

/// A named function, optionally guarded.
pub fn named_func(
    name: &str,
    params: Vec<Param>,
    ret: Option<&str>,
    when: Option<Spanned<Expr>>,
    body: Vec<Spanned<Stmt>>,
) -> Function {
    Function {
        name: Some(name.to_string()),
        when: when.map(Box::new),
        ..func(params, ret, body)
    }
}

// ============================================================================
// Statements
// ============================================================================

fn decl(kind: DeclKind, name: &str, ty_name: Option<&str>, value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Decl(Decl {
        kind,
        name: name.to_string(),
        ty: ty_name.map(ty),
        value,
    }))
}

pub fn let_(name: &str, ty_name: Option<&str>, value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
    decl(DeclKind::Let, name, ty_name, value)
}

pub fn var_(name: &str, ty_name: Option<&str>, value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
    decl(DeclKind::Var, name, ty_name, value)
}

pub fn assign(name: &str, path: &[&str], op: AssignOp, value: Spanned<Expr>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Assign(PathAssign {
        name: name.to_string(),
        path: path.iter().map(|p| Spanned::dummy(p.to_string())).collect(),
        op,
        value,
    }))
}

pub fn return_(value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Return(value))
}

pub fn if_(
    cond: Spanned<Expr>,
    then_block: Vec<Spanned<Stmt>>,
    else_ifs: Vec<(Spanned<Expr>, Vec<Spanned<Stmt>>)>,
    else_block: Option<Vec<Spanned<Stmt>>>,
) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::If(IfStmt {
        cond,
        then_block: block(then_block),
        else_ifs: else_ifs
            .into_iter()
            .map(|(cond, stmts)| ElseIf {
                cond,
                block: block(stmts),
            })
            .collect(),
        else_block: else_block.map(block),
    }))
}

pub fn while_(cond: Spanned<Expr>, body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::While(WhileStmt {
        cond,
        block: block(body),
    }))
}

pub fn for_(
    init: Spanned<Stmt>,
    cond: Option<Spanned<Expr>>,
    after: Spanned<Stmt>,
    body: Vec<Spanned<Stmt>>,
) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::For(ForStmt {
        init: Box::new(init),
        cond,
        after: Box::new(after),
        block: block(body),
    }))
}

pub fn binary_stmt(lhs: Spanned<Expr>, op: BinaryOp, rhs: Spanned<Expr>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Binary(BinaryExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }))
}

pub fn chain_stmt(name: &str, segments: Vec<ChainSegment>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Chain(Chain {
        name: name.to_string(),
        segments: segments.into_iter().map(Spanned::dummy).collect(),
    }))
}

pub fn function_stmt(function: Function) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Function(function))
}

pub fn multi(name: &str, params: &[(&str, &str)], ret: Option<&str>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Multi(MultiDecl {
        name: name.to_string(),
        params: params
            .iter()
            .map(|(name, ty_name)| MultiParam {
                name: name.to_string(),
                ty: ty(ty_name),
            })
            .collect(),
        ret: ret.map(ty),
    }))
}

pub fn class(name: &str, body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Class(ClassDecl {
        name: name.to_string(),
        body: block(body),
    }))
}

pub fn init(params: Vec<Param>, body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    Spanned::dummy(Stmt::Init(InitDecl {
        params,
        block: block(body),
    }))
}
