//! Expression definitions for the input AST.
//!
//! Expressions are supplied by the host embedding and carry the source
//! span of the construct they were lowered from, so diagnostics can
//! highlight the offending reference.

use crate::Span;

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Str(String, Span),
    Bool(bool, Span),
    NoneLiteral(Span),
    Name(String, Span),
    Attribute {
        object: Box<Expr>,
        attribute: String,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: Span,
    },
    List(Vec<Expr>, Span),
    Tuple(Vec<Expr>, Span),
    Dict(Vec<(Expr, Expr)>, Span),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Int(_, span) => span,
            Expr::Float(_, span) => span,
            Expr::Str(_, span) => span,
            Expr::Bool(_, span) => span,
            Expr::NoneLiteral(span) => span,
            Expr::Name(_, span) => span,
            Expr::Attribute { span, .. } => span,
            Expr::Call { span, .. } => span,
            Expr::List(_, span) => span,
            Expr::Tuple(_, span) => span,
            Expr::Dict(_, span) => span,
        }
    }

    pub fn name(value: &str) -> Expr {
        Expr::Name(value.to_string(), Span::null())
    }

    pub fn attribute(object: Expr, attribute: &str) -> Expr {
        Expr::Attribute {
            object: Box::new(object),
            attribute: attribute.to_string(),
            span: Span::null(),
        }
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
            span: Span::null(),
        }
    }
}
