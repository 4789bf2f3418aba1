use std::fmt::Display;

use thiserror::Error;

use crate::ast::types::ContainerKind;
use crate::{Position, Span};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MissingTypeParameter { .. } => "MissingTypeParameter",
            ErrorImpl::WrongTypeParameterCount { .. } => "WrongTypeParameterCount",
            ErrorImpl::HeterogeneousContainer { .. } => "HeterogeneousContainer",
            ErrorImpl::Redeclaration { .. } => "Redeclaration",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::UnresolvedTypeName { .. } => "UnresolvedTypeName",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentType { .. } => "ArgumentType",
            ErrorImpl::IgnoredAttributeUse { .. } => "IgnoredAttributeUse",
            ErrorImpl::UnknownAttribute { .. } => "UnknownAttribute",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, is the annotation well-formed?",
                token
            )),
            ErrorImpl::MissingTypeParameter { kind } => ErrorTip::Suggestion(format!(
                "Add a contained type, e.g. `{}[int]`",
                kind
            )),
            ErrorImpl::WrongTypeParameterCount {
                kind,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` takes {} contained types, received {}",
                kind, expected, received
            )),
            ErrorImpl::HeterogeneousContainer { kind, .. } => ErrorTip::Suggestion(format!(
                "All elements of a `{}` literal must share one type",
                kind
            )),
            ErrorImpl::Redeclaration { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already exists, move the annotation to its first use",
                variable
            )),
            ErrorImpl::TypeMismatch { expected, .. } => ErrorTip::Suggestion(format!(
                "Assign a value of type `{}` or change the annotation",
                expected
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Declared return type is `{}`, returned `{}`",
                expected, received
            )),
            ErrorImpl::UnresolvedTypeName { name } => ErrorTip::Suggestion(format!(
                "`{}` is not visible lexically, in the module, or to the runtime",
                name
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::NotCallable { received } => {
                ErrorTip::Suggestion(format!("A value of type `{}` cannot be called", received))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentType {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected argument type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::IgnoredAttributeUse { attribute } => ErrorTip::Suggestion(format!(
                "`{}` is in the class ignore set and only callable from outside compiled code",
                attribute
            )),
            ErrorImpl::UnknownAttribute { attribute, on } => {
                ErrorTip::Suggestion(format!("`{}` has no attribute `{}`", on, attribute))
            }
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("Attempted to use {kind} without a contained type")]
    MissingTypeParameter { kind: ContainerKind },
    #[error("{kind} requires {expected} contained types but received {received}")]
    WrongTypeParameterCount {
        kind: ContainerKind,
        expected: usize,
        received: usize,
    },
    #[error("{kind}s must contain only a single type, found {first} and {second}")]
    HeterogeneousContainer {
        kind: ContainerKind,
        first: String,
        second: String,
    },
    #[error("variable {variable:?} is already defined: you can only declare and annotate a variable once")]
    Redeclaration { variable: String },
    #[error("variable {variable:?} is annotated with type {expected} but is being assigned a value of type {received}")]
    TypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("returned a value of type {received} but the declared return type is {expected}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("could not resolve type name {name:?}")]
    UnresolvedTypeName { name: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("a value of type {received} is not callable")]
    NotCallable { received: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument '{parameter}' has declared type {expected} but received a value of type {received}")]
    ArgumentType {
        parameter: String,
        expected: String,
        received: String,
    },
    #[error("attribute was ignored during compilation: {attribute:?}")]
    IgnoredAttributeUse { attribute: String },
    #[error("attribute {attribute:?} does not exist on {on}")]
    UnknownAttribute { attribute: String, on: String },
}
