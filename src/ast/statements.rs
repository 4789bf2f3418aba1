//! Statement definitions for the input AST.
//!
//! Statements mirror the host language's function bodies after the
//! embedding has lowered them: assignments (optionally annotated),
//! conditionals, bounded loops, returns, and bare expressions.
//! The host language has function-level scoping, so branch and loop
//! bodies share their enclosing function's scope.

use crate::Span;

use super::expressions::Expr;

#[derive(Debug, Clone)]
pub enum Stmt {
    Assign {
        target: String,
        annotation: Option<String>,
        value: Expr,
        span: Span,
    },
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
        span: Span,
    },
    Loop {
        body: Vec<Stmt>,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Expression {
        expression: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Assign { span, .. } => span,
            Stmt::If { span, .. } => span,
            Stmt::Loop { span, .. } => span,
            Stmt::Return { span, .. } => span,
            Stmt::Expression { span, .. } => span,
        }
    }

    pub fn assign(target: &str, annotation: Option<&str>, value: Expr) -> Stmt {
        Stmt::Assign {
            target: target.to_string(),
            annotation: annotation.map(String::from),
            value,
            span: Span::null(),
        }
    }

    pub fn expression(expression: Expr) -> Stmt {
        Stmt::Expression {
            expression,
            span: Span::null(),
        }
    }
}
