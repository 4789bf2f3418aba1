//! The typed IR produced by a successful check.
//!
//! Every expression carries the static type the checker assigned to it.
//! Calls into host-only code are marked opaque: the compiled graph
//! treats them as boundary calls with a declared signature and no body.

use crate::{ast::types::TypeNode, gate::gate::MemberTable, Span};

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Name(String),
    Attribute {
        object: Box<TypedExpr>,
        attribute: String,
    },
    Call {
        callee: Box<TypedExpr>,
        arguments: Vec<TypedExpr>,
        opaque: bool,
    },
    List(Vec<TypedExpr>),
    Tuple(Vec<TypedExpr>),
    Dict(Vec<(TypedExpr, TypedExpr)>),
}

#[derive(Debug, Clone)]
pub enum TypedStmt {
    Assign {
        target: String,
        annotated: bool,
        ty: TypeNode,
        value: TypedExpr,
        span: Span,
    },
    If {
        condition: TypedExpr,
        then_body: Vec<TypedStmt>,
        else_body: Vec<TypedStmt>,
        span: Span,
    },
    Loop {
        body: Vec<TypedStmt>,
        span: Span,
    },
    Return {
        value: Option<TypedExpr>,
        span: Span,
    },
    Expression {
        expression: TypedExpr,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub struct TypedFunction {
    pub name: String,
    pub params: Vec<(String, TypeNode)>,
    pub return_type: TypeNode,
    pub body: Vec<TypedStmt>,
    pub span: Span,
}

/// A fully checked class.
///
/// Only compiled members appear in `attributes` and `methods`; ignored
/// members are absent from the IR but still recorded in the member
/// table so references to them can be diagnosed.
#[derive(Debug, Clone)]
pub struct TypedClass {
    pub name: String,
    pub attributes: Vec<(String, TypeNode)>,
    pub methods: Vec<TypedFunction>,
    pub members: MemberTable,
    pub span: Span,
}
