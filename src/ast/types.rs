//! The static type model.
//!
//! This module defines the set of representable static types, including:
//!
//! - Primitive types (numerics, strings, booleans, the none type)
//! - Opaque runtime value types (tensors, devices)
//! - Containers (lists, dicts, tuples, optionals) with arity rules
//! - User class references and callables
//! - Unresolved name references awaiting resolution
//!
//! Type nodes are constructed during annotation parsing and resolution,
//! are immutable once validated, and are owned by the typed IR node that
//! references them.

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorImpl};
use crate::Span;

/// Represents the primitive types of the host runtime.
///
/// `Scalar` is the runtime's numeric supertype: it accepts both `Int`
/// and `Float` values and is what the name `number` resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Str,
    NoneType,
    Scalar,
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Int => write!(f, "int"),
            Primitive::Float => write!(f, "float"),
            Primitive::Bool => write!(f, "bool"),
            Primitive::Str => write!(f, "str"),
            Primitive::NoneType => write!(f, "None"),
            Primitive::Scalar => write!(f, "Scalar"),
        }
    }
}

/// The parameterized container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Dict,
    Tuple,
    Optional,
}

impl ContainerKind {
    pub fn from_name(name: &str) -> Option<ContainerKind> {
        match name {
            "List" => Some(ContainerKind::List),
            "Dict" => Some(ContainerKind::Dict),
            "Tuple" => Some(ContainerKind::Tuple),
            "Optional" => Some(ContainerKind::Optional),
            _ => None,
        }
    }

    /// The exact number of type parameters the kind requires, or None
    /// when any non-zero count is accepted.
    pub fn arity(&self) -> Option<usize> {
        match self {
            ContainerKind::List => Some(1),
            ContainerKind::Dict => Some(2),
            ContainerKind::Tuple => None,
            ContainerKind::Optional => Some(1),
        }
    }
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::List => write!(f, "List"),
            ContainerKind::Dict => write!(f, "Dict"),
            ContainerKind::Tuple => write!(f, "Tuple"),
            ContainerKind::Optional => write!(f, "Optional"),
        }
    }
}

/// A callable signature: named parameters, a return type, and whether
/// trailing arguments beyond the declared parameters are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableType {
    pub name: String,
    pub params: Vec<(String, TypeNode)>,
    pub ret: Box<TypeNode>,
    pub is_var_args: bool,
}

/// A node in the static type model.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(Primitive),
    Tensor,
    Device,
    List(Box<TypeNode>),
    Dict(Box<TypeNode>, Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    Optional(Box<TypeNode>),
    Class(String),
    Callable(CallableType),
    Unresolved(String),
    Any,
}

impl TypeNode {
    /// Constructs a container type, enforcing the kind's arity rules.
    ///
    /// An empty parameter list fails with `MissingTypeParameter` naming
    /// the kind; a non-empty list of the wrong length fails with
    /// `WrongTypeParameterCount`.
    pub fn container(
        kind: ContainerKind,
        mut params: Vec<TypeNode>,
        span: &Span,
    ) -> Result<TypeNode, Error> {
        if params.is_empty() {
            return Err(Error::new(
                ErrorImpl::MissingTypeParameter { kind },
                span.clone(),
            ));
        }

        if let Some(arity) = kind.arity() {
            if params.len() != arity {
                return Err(Error::new(
                    ErrorImpl::WrongTypeParameterCount {
                        kind,
                        expected: arity,
                        received: params.len(),
                    },
                    span.clone(),
                ));
            }
        }

        Ok(match kind {
            ContainerKind::List => TypeNode::List(Box::new(params.remove(0))),
            ContainerKind::Dict => {
                let key = params.remove(0);
                let value = params.remove(0);
                TypeNode::Dict(Box::new(key), Box::new(value))
            }
            ContainerKind::Tuple => TypeNode::Tuple(params),
            ContainerKind::Optional => TypeNode::Optional(Box::new(params.remove(0))),
        })
    }

    pub fn optional(inner: TypeNode) -> TypeNode {
        match inner {
            TypeNode::Optional(_) => inner,
            other => TypeNode::Optional(Box::new(other)),
        }
    }

    /// Checks whether a value of type `other` may be used where `self`
    /// is declared.
    ///
    /// Exact matches, `int -> float` widening, `Scalar` over numerics,
    /// `Optional[T]` over `T` and `None`, and `Any` in either direction
    /// are accepted. Containers are compatible element-wise.
    pub fn is_compatible_with(&self, other: &TypeNode) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (TypeNode::Any, _) | (_, TypeNode::Any) => true,
            (TypeNode::Primitive(Primitive::Float), TypeNode::Primitive(Primitive::Int)) => true,
            (TypeNode::Primitive(Primitive::Scalar), TypeNode::Primitive(Primitive::Int)) => true,
            (TypeNode::Primitive(Primitive::Scalar), TypeNode::Primitive(Primitive::Float)) => true,
            (TypeNode::Optional(inner), other) => match other {
                TypeNode::Primitive(Primitive::NoneType) => true,
                TypeNode::Optional(other_inner) => inner.is_compatible_with(other_inner),
                other => inner.is_compatible_with(other),
            },
            (TypeNode::List(a), TypeNode::List(b)) => a.is_compatible_with(b),
            (TypeNode::Dict(ak, av), TypeNode::Dict(bk, bv)) => {
                ak.is_compatible_with(bk) && av.is_compatible_with(bv)
            }
            (TypeNode::Tuple(a), TypeNode::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.is_compatible_with(y))
            }
            _ => false,
        }
    }

    /// Computes the least common supertype of two types, or None when no
    /// supertype exists.
    ///
    /// `int`/`float` unify to `float`, a type and `None` unify to the
    /// optional of that type, containers unify element-wise.
    pub fn unify(a: &TypeNode, b: &TypeNode) -> Option<TypeNode> {
        if a == b {
            return Some(a.clone());
        }

        match (a, b) {
            (TypeNode::Any, other) | (other, TypeNode::Any) => Some(other.clone()),
            (TypeNode::Primitive(Primitive::Int), TypeNode::Primitive(Primitive::Float))
            | (TypeNode::Primitive(Primitive::Float), TypeNode::Primitive(Primitive::Int)) => {
                Some(TypeNode::Primitive(Primitive::Float))
            }
            (TypeNode::Primitive(Primitive::Scalar), TypeNode::Primitive(Primitive::Int))
            | (TypeNode::Primitive(Primitive::Scalar), TypeNode::Primitive(Primitive::Float))
            | (TypeNode::Primitive(Primitive::Int), TypeNode::Primitive(Primitive::Scalar))
            | (TypeNode::Primitive(Primitive::Float), TypeNode::Primitive(Primitive::Scalar)) => {
                Some(TypeNode::Primitive(Primitive::Scalar))
            }
            (TypeNode::Primitive(Primitive::NoneType), other)
            | (other, TypeNode::Primitive(Primitive::NoneType)) => {
                Some(TypeNode::optional(other.clone()))
            }
            (TypeNode::Optional(inner), other) | (other, TypeNode::Optional(inner)) => {
                TypeNode::unify(inner, other).map(TypeNode::optional)
            }
            (TypeNode::List(a), TypeNode::List(b)) => {
                TypeNode::unify(a, b).map(|t| TypeNode::List(Box::new(t)))
            }
            (TypeNode::Dict(ak, av), TypeNode::Dict(bk, bv)) => {
                let key = TypeNode::unify(ak, bk)?;
                let value = TypeNode::unify(av, bv)?;
                Some(TypeNode::Dict(Box::new(key), Box::new(value)))
            }
            (TypeNode::Tuple(a), TypeNode::Tuple(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                let mut unified = Vec::with_capacity(a.len());
                for (x, y) in a.iter().zip(b.iter()) {
                    unified.push(TypeNode::unify(x, y)?);
                }
                Some(TypeNode::Tuple(unified))
            }
            _ => None,
        }
    }

    /// Returns the type of a property or method on the type.
    ///
    /// Note: This includes the builtin methods of containers and the
    /// runtime value types (e.g. `List.append`, `Tensor.device`).
    pub fn get_property_type(&self, property: &str) -> Option<TypeNode> {
        match self {
            TypeNode::List(element) => match property {
                "append" => Some(TypeNode::Callable(CallableType {
                    name: "append".to_string(),
                    params: vec![("value".to_string(), (**element).clone())],
                    ret: Box::new(TypeNode::Primitive(Primitive::NoneType)),
                    is_var_args: false,
                })),
                "len" => Some(TypeNode::Callable(CallableType {
                    name: "len".to_string(),
                    params: vec![],
                    ret: Box::new(TypeNode::Primitive(Primitive::Int)),
                    is_var_args: false,
                })),
                _ => None,
            },
            TypeNode::Tensor => match property {
                "device" => Some(TypeNode::Device),
                _ => None,
            },
            TypeNode::Primitive(Primitive::Str) => match property {
                "len" => Some(TypeNode::Callable(CallableType {
                    name: "len".to_string(),
                    params: vec![],
                    ret: Box::new(TypeNode::Primitive(Primitive::Int)),
                    is_var_args: false,
                })),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Primitive(primitive) => write!(f, "{}", primitive),
            TypeNode::Tensor => write!(f, "Tensor"),
            TypeNode::Device => write!(f, "Device"),
            TypeNode::List(element) => write!(f, "List[{}]", element),
            TypeNode::Dict(key, value) => write!(f, "Dict[{}, {}]", key, value),
            TypeNode::Tuple(elements) => {
                write!(f, "Tuple[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            TypeNode::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeNode::Class(name) => write!(f, "{}", name),
            TypeNode::Callable(callable) => {
                write!(f, "(")?;
                for (index, (_, param)) in callable.params.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") -> {}", callable.ret)
            }
            TypeNode::Unresolved(name) => write!(f, "{}", name),
            TypeNode::Any => write!(f, "Any"),
        }
    }
}
