use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::ast::CompilationUnit,
    ast::types::{ContainerKind, Primitive, TypeNode},
    errors::errors::{Error, ErrorImpl},
    Span,
};

lazy_static! {
    /// The type names the host runtime always provides.
    static ref RUNTIME_TYPES: HashMap<&'static str, TypeNode> = {
        let mut map = HashMap::new();
        map.insert("int", TypeNode::Primitive(Primitive::Int));
        map.insert("float", TypeNode::Primitive(Primitive::Float));
        map.insert("bool", TypeNode::Primitive(Primitive::Bool));
        map.insert("str", TypeNode::Primitive(Primitive::Str));
        map.insert("None", TypeNode::Primitive(Primitive::NoneType));
        map.insert("number", TypeNode::Primitive(Primitive::Scalar));
        map.insert("Scalar", TypeNode::Primitive(Primitive::Scalar));
        map.insert("Tensor", TypeNode::Tensor);
        map.insert("torch.Tensor", TypeNode::Tensor);
        map.insert("device", TypeNode::Device);
        map.insert("torch.device", TypeNode::Device);
        map.insert("Any", TypeNode::Any);
        map
    };
}

/// The ordered strategies consulted when resolving a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    Lexical,
    Module,
    Runtime,
}

/// A lexical scope of locally visible type names.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<String, TypeNode>,
}

/// Resolves unresolved name leaves in raw type nodes.
pub struct Resolver<'a> {
    scopes: Vec<Scope>,
    unit: &'a CompilationUnit,
}

impl<'a> Resolver<'a> {
    pub fn new(unit: &'a CompilationUnit) -> Resolver<'a> {
        Resolver {
            scopes: vec![],
            unit,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Binds a type name in the innermost lexical scope.
    pub fn declare_type(&mut self, name: &str, node: TypeNode) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name.to_string(), node);
        }
    }

    /// Resolves a single name by trying each strategy in order.
    pub fn resolve_name(&self, name: &str, span: &Span) -> Result<TypeNode, Error> {
        for strategy in [
            ResolutionStrategy::Lexical,
            ResolutionStrategy::Module,
            ResolutionStrategy::Runtime,
        ] {
            if let Some(node) = self.lookup(strategy, name) {
                return Ok(node);
            }
        }

        Err(Error::new(
            ErrorImpl::UnresolvedTypeName {
                name: name.to_string(),
            },
            span.clone(),
        ))
    }

    fn lookup(&self, strategy: ResolutionStrategy, name: &str) -> Option<TypeNode> {
        match strategy {
            ResolutionStrategy::Lexical => {
                for scope in self.scopes.iter().rev() {
                    if let Some(node) = scope.names.get(name) {
                        return Some(node.clone());
                    }
                }
                None
            }
            ResolutionStrategy::Module => self
                .unit
                .get_class(name)
                .map(|class| TypeNode::Class(class.name.clone())),
            ResolutionStrategy::Runtime => RUNTIME_TYPES.get(name).cloned(),
        }
    }

    /// Rewrites every unresolved leaf of a raw type node.
    ///
    /// A container head used without a subscript reaches this point as a
    /// bare unresolved name and is rejected here, naming the kind.
    pub fn resolve(&self, node: &TypeNode, span: &Span) -> Result<TypeNode, Error> {
        match node {
            TypeNode::Unresolved(name) => {
                if let Some(kind) = ContainerKind::from_name(name) {
                    return Err(Error::new(
                        ErrorImpl::MissingTypeParameter { kind },
                        span.clone(),
                    ));
                }
                self.resolve_name(name, span)
            }
            TypeNode::List(element) => Ok(TypeNode::List(Box::new(self.resolve(element, span)?))),
            TypeNode::Dict(key, value) => Ok(TypeNode::Dict(
                Box::new(self.resolve(key, span)?),
                Box::new(self.resolve(value, span)?),
            )),
            TypeNode::Tuple(elements) => {
                let mut resolved = Vec::with_capacity(elements.len());
                for element in elements {
                    resolved.push(self.resolve(element, span)?);
                }
                Ok(TypeNode::Tuple(resolved))
            }
            TypeNode::Optional(inner) => {
                Ok(TypeNode::Optional(Box::new(self.resolve(inner, span)?)))
            }
            other => Ok(other.clone()),
        }
    }
}
