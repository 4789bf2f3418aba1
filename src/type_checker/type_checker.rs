use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::{Class, CompilationUnit, Function},
    ast::expressions::Expr,
    ast::statements::Stmt,
    ast::types::{CallableType, ContainerKind, Primitive, TypeNode},
    errors::errors::{Error, ErrorImpl},
    gate::gate::{flatten_class, FlatClass, MemberDecision, MemberKind},
    parser::annotations::{parse_annotation, signature_annotations},
    resolver::resolver::Resolver,
    Span,
};

use super::typed_ast::{TypedClass, TypedExpr, TypedExprKind, TypedFunction, TypedStmt};

/// A variable binding in an environment.
///
/// Annotated bindings have a fixed type; inferred bindings may widen as
/// later assignments are seen.
#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: TypeNode,
    pub annotated: bool,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }
}

/// The class whose methods are currently being checked.
#[derive(Debug, Clone)]
struct ClassContext {
    name: String,
    flat: FlatClass,
    attribute_types: HashMap<String, TypeNode>,
    method_signatures: HashMap<String, CallableType>,
}

pub struct TypeChecker<'a> {
    unit: &'a CompilationUnit,
    resolver: Resolver<'a>,
    environments: Vec<Environment>,
    globals: HashMap<String, TypeNode>,
    class_context: Option<ClassContext>,
    return_type: Option<TypeNode>,
    return_annotated: bool,
    file: Rc<String>,
}

/// Checks a module-level function against its annotations.
pub fn type_check_function(
    function: &Function,
    unit: &CompilationUnit,
) -> Result<TypedFunction, Error> {
    let mut type_checker = TypeChecker::new(unit);
    type_checker.check_function(function)
}

/// Checks a class: gates its members, checks the compiled method bodies
/// and caches the result on the unit.
///
/// Ignored method bodies are never checked; they stay host-only and are
/// reachable from compiled code only as opaque boundary calls.
pub fn type_check_class(class: &Class, unit: &CompilationUnit) -> Result<Rc<TypedClass>, Error> {
    if let Some(cached) = unit.cached_class(&class.name) {
        return Ok(cached);
    }

    let flat = flatten_class(class, unit)?;
    let mut type_checker = TypeChecker::new(unit);

    // The enclosing class's own name is visible lexically to its member
    // annotations, whether or not the unit has registered the class
    type_checker.resolver.push_scope();
    type_checker
        .resolver
        .declare_type(&flat.name, TypeNode::Class(flat.name.clone()));

    let context = type_checker.build_context(&flat)?;

    let mut attributes = vec![];
    for attribute in &flat.attributes {
        if let Some(ty) = context.attribute_types.get(&attribute.name) {
            attributes.push((attribute.name.clone(), ty.clone()));
        }
    }

    type_checker.class_context = Some(context);

    let mut methods = vec![];
    for method in &flat.methods {
        let ignored = flat
            .table
            .decision(&method.name)
            .is_some_and(|member| member.decision == MemberDecision::Ignored);
        if ignored {
            continue;
        }
        methods.push(type_checker.check_function(method)?);
    }

    type_checker.resolver.pop_scope();

    let typed = Rc::new(TypedClass {
        name: flat.name.clone(),
        attributes,
        methods,
        members: flat.table.clone(),
        span: class.span.clone(),
    });
    unit.cache_class(Rc::clone(&typed));
    Ok(typed)
}

impl<'a> TypeChecker<'a> {
    pub fn new(unit: &'a CompilationUnit) -> TypeChecker<'a> {
        let mut globals = HashMap::new();

        // Builtin runtime values visible to every function body
        globals.insert(
            String::from("print"),
            TypeNode::Callable(CallableType {
                name: String::from("print"),
                params: vec![],
                ret: Box::new(TypeNode::Primitive(Primitive::NoneType)),
                is_var_args: true,
            }),
        );
        globals.insert(
            String::from("torch.ones"),
            TypeNode::Callable(CallableType {
                name: String::from("torch.ones"),
                params: vec![(String::from("size"), TypeNode::Primitive(Primitive::Int))],
                ret: Box::new(TypeNode::Tensor),
                is_var_args: true,
            }),
        );
        globals.insert(
            String::from("torch.randn"),
            TypeNode::Callable(CallableType {
                name: String::from("torch.randn"),
                params: vec![(String::from("size"), TypeNode::Primitive(Primitive::Int))],
                ret: Box::new(TypeNode::Tensor),
                is_var_args: true,
            }),
        );
        globals.insert(
            String::from("torch.tensor"),
            TypeNode::Callable(CallableType {
                name: String::from("torch.tensor"),
                params: vec![(String::from("data"), TypeNode::Any)],
                ret: Box::new(TypeNode::Tensor),
                is_var_args: false,
            }),
        );

        TypeChecker {
            unit,
            resolver: Resolver::new(unit),
            environments: vec![],
            globals,
            class_context: None,
            return_type: None,
            return_annotated: false,
            file: Rc::clone(&unit.name),
        }
    }

    fn find_binding(&self, name: &str) -> Option<&Binding> {
        for environment in self.environments.iter().rev() {
            if let Some(binding) = environment.variable_lookup.get(name) {
                return Some(binding);
            }
        }
        None
    }

    fn declare(&mut self, name: &str, binding: Binding) {
        if let Some(environment) = self.environments.last_mut() {
            environment.variable_lookup.insert(name.to_string(), binding);
        }
    }

    fn current_variables(&self) -> HashMap<String, Binding> {
        self.environments
            .last()
            .map(|environment| environment.variable_lookup.clone())
            .unwrap_or_default()
    }

    fn replace_variables(&mut self, variables: HashMap<String, Binding>) -> HashMap<String, Binding> {
        match self.environments.last_mut() {
            Some(environment) => std::mem::replace(&mut environment.variable_lookup, variables),
            None => HashMap::new(),
        }
    }

    /// Resolves the declared signature of a function, falling back to
    /// the runtime's default binding type for unannotated positions.
    fn callable_signature(&self, function: &Function) -> Result<CallableType, Error> {
        let (annotations, ret) = signature_annotations(function, Rc::clone(&self.file))?;

        let mut params = vec![];
        for (param, annotation) in function.params.iter().zip(annotations) {
            let ty = match annotation {
                Some(annotation) => self.resolver.resolve(&annotation.node, &annotation.span)?,
                None => TypeNode::Tensor,
            };
            params.push((param.name.clone(), ty));
        }

        let ret = match ret {
            Some(annotation) => self.resolver.resolve(&annotation.node, &annotation.span)?,
            None => TypeNode::Tensor,
        };

        Ok(CallableType {
            name: function.name.clone(),
            params,
            ret: Box::new(ret),
            is_var_args: false,
        })
    }

    /// Resolves the member types of a flattened class: annotation types
    /// for compiled attributes, declared signatures for every method.
    fn build_context(&self, flat: &FlatClass) -> Result<ClassContext, Error> {
        let mut attribute_types = HashMap::new();
        for attribute in &flat.attributes {
            let ignored = flat
                .table
                .decision(&attribute.name)
                .is_some_and(|member| member.decision == MemberDecision::Ignored);
            if ignored {
                // Host-only attributes keep their host types
                continue;
            }

            let ty = match &attribute.annotation {
                Some(source) => {
                    let raw = parse_annotation(source, Rc::clone(&self.file))?;
                    self.resolver.resolve(&raw, &attribute.span)?
                }
                None => TypeNode::Tensor,
            };
            attribute_types.insert(attribute.name.clone(), ty);
        }

        let mut method_signatures = HashMap::new();
        for method in &flat.methods {
            method_signatures.insert(method.name.clone(), self.callable_signature(method)?);
        }

        Ok(ClassContext {
            name: flat.name.clone(),
            flat: flat.clone(),
            attribute_types,
            method_signatures,
        })
    }

    pub fn check_function(&mut self, function: &Function) -> Result<TypedFunction, Error> {
        let (annotations, ret) = signature_annotations(function, Rc::clone(&self.file))?;

        self.environments.push(Environment::new());

        let mut params = vec![];
        for (param, annotation) in function.params.iter().zip(annotations) {
            let ty = match annotation {
                Some(annotation) => self.resolver.resolve(&annotation.node, &annotation.span)?,
                None => TypeNode::Tensor,
            };
            self.declare(
                &param.name,
                Binding {
                    ty: ty.clone(),
                    annotated: true,
                    span: param.span.clone(),
                },
            );
            params.push((param.name.clone(), ty));
        }

        match ret {
            Some(annotation) => {
                self.return_type =
                    Some(self.resolver.resolve(&annotation.node, &annotation.span)?);
                self.return_annotated = true;
            }
            None => {
                self.return_type = None;
                self.return_annotated = false;
            }
        }

        let body = self.check_block(&function.body)?;

        self.environments.pop();
        let return_type = self
            .return_type
            .take()
            .unwrap_or(TypeNode::Primitive(Primitive::NoneType));
        self.return_annotated = false;

        Ok(TypedFunction {
            name: function.name.clone(),
            params,
            return_type,
            body,
            span: function.span.clone(),
        })
    }

    fn check_block(&mut self, body: &[Stmt]) -> Result<Vec<TypedStmt>, Error> {
        let mut typed = Vec::with_capacity(body.len());
        for stmt in body {
            typed.push(self.check_stmt(stmt)?);
        }
        Ok(typed)
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<TypedStmt, Error> {
        match stmt {
            Stmt::Assign {
                target,
                annotation,
                value,
                span,
            } => self.check_assign(target, annotation.as_deref(), value, span),
            Stmt::If {
                condition,
                then_body,
                else_body,
                span,
            } => {
                let condition = self.check_expr(condition)?;

                let snapshot = self.current_variables();
                let then_typed = self.check_block(then_body)?;
                let then_vars = self.replace_variables(snapshot.clone());
                let else_typed = self.check_block(else_body)?;
                let else_vars = self.replace_variables(snapshot.clone());

                let merged = merge_branches(&snapshot, &then_vars, &else_vars, span)?;
                self.replace_variables(merged);

                Ok(TypedStmt::If {
                    condition,
                    then_body: then_typed,
                    else_body: else_typed,
                    span: span.clone(),
                })
            }
            Stmt::Loop { body, span } => {
                let before = self.current_variables();
                let typed = self.check_block(body)?;

                // One pass over the body; bindings reassigned inside the
                // loop widen to cover both the entry and loop-back types.
                let after = self.current_variables();
                for (name, binding) in &before {
                    let Some(post) = after.get(name) else { continue };
                    if post.ty == binding.ty || binding.annotated {
                        continue;
                    }
                    let Some(ty) = TypeNode::unify(&binding.ty, &post.ty) else {
                        return Err(Error::new(
                            ErrorImpl::TypeMismatch {
                                variable: name.clone(),
                                expected: binding.ty.to_string(),
                                received: post.ty.to_string(),
                            },
                            span.clone(),
                        ));
                    };
                    if let Some(environment) = self.environments.last_mut() {
                        if let Some(current) = environment.variable_lookup.get_mut(name) {
                            current.ty = ty;
                        }
                    }
                }

                Ok(TypedStmt::Loop {
                    body: typed,
                    span: span.clone(),
                })
            }
            Stmt::Return { value, span } => {
                let expected = self.return_type.clone();
                let value = match value {
                    Some(value) => Some(self.check_expr_expecting(value, expected.as_ref())?),
                    None => None,
                };
                let received = value
                    .as_ref()
                    .map(|value| value.ty.clone())
                    .unwrap_or(TypeNode::Primitive(Primitive::NoneType));

                if self.return_annotated {
                    let expected = expected.unwrap_or(TypeNode::Primitive(Primitive::NoneType));
                    if !expected.is_compatible_with(&received) {
                        return Err(Error::new(
                            ErrorImpl::ReturnTypeMismatch {
                                expected: expected.to_string(),
                                received: received.to_string(),
                            },
                            span.clone(),
                        ));
                    }
                } else {
                    self.return_type = match &self.return_type {
                        None => Some(received.clone()),
                        Some(previous) => {
                            let Some(unified) = TypeNode::unify(previous, &received) else {
                                return Err(Error::new(
                                    ErrorImpl::ReturnTypeMismatch {
                                        expected: previous.to_string(),
                                        received: received.to_string(),
                                    },
                                    span.clone(),
                                ));
                            };
                            Some(unified)
                        }
                    };
                }

                Ok(TypedStmt::Return {
                    value,
                    span: span.clone(),
                })
            }
            Stmt::Expression { expression, span } => Ok(TypedStmt::Expression {
                expression: self.check_expr(expression)?,
                span: span.clone(),
            }),
        }
    }

    fn check_assign(
        &mut self,
        target: &str,
        annotation: Option<&str>,
        value: &Expr,
        span: &Span,
    ) -> Result<TypedStmt, Error> {
        if let Some(annotation) = annotation {
            // An annotation both declares and types; the name must be new
            if self.find_binding(target).is_some() {
                return Err(Error::new(
                    ErrorImpl::Redeclaration {
                        variable: target.to_string(),
                    },
                    span.clone(),
                ));
            }

            let raw = parse_annotation(annotation, Rc::clone(&self.file))?;
            let declared = self.resolver.resolve(&raw, span)?;

            let value = self.check_expr_expecting(value, Some(&declared))?;
            if !declared.is_compatible_with(&value.ty) {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        variable: target.to_string(),
                        expected: declared.to_string(),
                        received: value.ty.to_string(),
                    },
                    value.span.clone(),
                ));
            }

            self.declare(
                target,
                Binding {
                    ty: declared.clone(),
                    annotated: true,
                    span: span.clone(),
                },
            );

            return Ok(TypedStmt::Assign {
                target: target.to_string(),
                annotated: true,
                ty: declared,
                value,
                span: span.clone(),
            });
        }

        let existing = self.find_binding(target).cloned();
        let expected = existing.as_ref().map(|binding| binding.ty.clone());
        let value = self.check_expr_expecting(value, expected.as_ref())?;

        let ty = match existing {
            Some(binding) if binding.annotated => {
                if !binding.ty.is_compatible_with(&value.ty) {
                    return Err(Error::new(
                        ErrorImpl::TypeMismatch {
                            variable: target.to_string(),
                            expected: binding.ty.to_string(),
                            received: value.ty.to_string(),
                        },
                        value.span.clone(),
                    ));
                }
                binding.ty
            }
            Some(binding) => {
                let Some(unified) = TypeNode::unify(&binding.ty, &value.ty) else {
                    return Err(Error::new(
                        ErrorImpl::TypeMismatch {
                            variable: target.to_string(),
                            expected: binding.ty.to_string(),
                            received: value.ty.to_string(),
                        },
                        value.span.clone(),
                    ));
                };
                self.declare(
                    target,
                    Binding {
                        ty: unified.clone(),
                        annotated: false,
                        span: span.clone(),
                    },
                );
                unified
            }
            None => {
                self.declare(
                    target,
                    Binding {
                        ty: value.ty.clone(),
                        annotated: false,
                        span: span.clone(),
                    },
                );
                value.ty.clone()
            }
        };

        Ok(TypedStmt::Assign {
            target: target.to_string(),
            annotated: false,
            ty,
            value,
            span: span.clone(),
        })
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<TypedExpr, Error> {
        self.check_expr_expecting(expr, None)
    }

    fn check_expr_expecting(
        &mut self,
        expr: &Expr,
        expected: Option<&TypeNode>,
    ) -> Result<TypedExpr, Error> {
        match expr {
            Expr::Int(value, span) => Ok(TypedExpr {
                kind: TypedExprKind::Int(*value),
                ty: TypeNode::Primitive(Primitive::Int),
                span: span.clone(),
            }),
            Expr::Float(value, span) => Ok(TypedExpr {
                kind: TypedExprKind::Float(*value),
                ty: TypeNode::Primitive(Primitive::Float),
                span: span.clone(),
            }),
            Expr::Str(value, span) => Ok(TypedExpr {
                kind: TypedExprKind::Str(value.clone()),
                ty: TypeNode::Primitive(Primitive::Str),
                span: span.clone(),
            }),
            Expr::Bool(value, span) => Ok(TypedExpr {
                kind: TypedExprKind::Bool(*value),
                ty: TypeNode::Primitive(Primitive::Bool),
                span: span.clone(),
            }),
            Expr::NoneLiteral(span) => Ok(TypedExpr {
                kind: TypedExprKind::None,
                ty: TypeNode::Primitive(Primitive::NoneType),
                span: span.clone(),
            }),
            Expr::Name(name, span) => {
                let Some(ty) = self.lookup_value(name)? else {
                    return Err(Error::new(
                        ErrorImpl::VariableNotDeclared {
                            variable: name.clone(),
                        },
                        span.clone(),
                    ));
                };
                Ok(TypedExpr {
                    kind: TypedExprKind::Name(name.clone()),
                    ty,
                    span: span.clone(),
                })
            }
            Expr::Attribute {
                object,
                attribute,
                span,
            } => {
                // Dotted runtime values resolve as a whole (`torch.ones`)
                if let Some(name) = dotted_name(expr) {
                    if let Some(ty) = self.globals.get(&name) {
                        return Ok(TypedExpr {
                            kind: TypedExprKind::Name(name.clone()),
                            ty: ty.clone(),
                            span: span.clone(),
                        });
                    }
                }

                let object = self.check_expr(object)?;
                let ty = match &object.ty {
                    TypeNode::Class(class_name) => self.class_member(class_name, attribute, span)?,
                    other => match other.get_property_type(attribute) {
                        Some(ty) => ty,
                        None => {
                            return Err(Error::new(
                                ErrorImpl::UnknownAttribute {
                                    attribute: attribute.clone(),
                                    on: other.to_string(),
                                },
                                span.clone(),
                            ))
                        }
                    },
                };

                Ok(TypedExpr {
                    kind: TypedExprKind::Attribute {
                        object: Box::new(object),
                        attribute: attribute.clone(),
                    },
                    ty,
                    span: span.clone(),
                })
            }
            Expr::Call {
                callee,
                arguments,
                span,
            } => {
                let callee = self.check_expr(callee)?;
                let signature = match &callee.ty {
                    TypeNode::Callable(signature) => signature.clone(),
                    other => {
                        return Err(Error::new(
                            ErrorImpl::NotCallable {
                                received: other.to_string(),
                            },
                            callee.span.clone(),
                        ))
                    }
                };

                if arguments.len() < signature.params.len() {
                    return Err(Error::new(
                        ErrorImpl::MissingArguments {
                            expected: signature.params.len(),
                            received: arguments.len(),
                        },
                        span.clone(),
                    ));
                }
                if arguments.len() > signature.params.len() && !signature.is_var_args {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedArguments {
                            expected: signature.params.len(),
                            received: arguments.len(),
                        },
                        span.clone(),
                    ));
                }

                let mut typed_arguments = vec![];
                for (index, argument) in arguments.iter().enumerate() {
                    let expected = signature.params.get(index).map(|(_, ty)| ty.clone());
                    let typed = self.check_expr_expecting(argument, expected.as_ref())?;

                    if let Some((parameter, ty)) = signature.params.get(index) {
                        if !ty.is_compatible_with(&typed.ty) {
                            return Err(Error::new(
                                ErrorImpl::ArgumentType {
                                    parameter: parameter.clone(),
                                    expected: ty.to_string(),
                                    received: typed.ty.to_string(),
                                },
                                typed.span.clone(),
                            ));
                        }
                    }
                    typed_arguments.push(typed);
                }

                let opaque = self.callee_is_opaque(&callee);
                let ty = (*signature.ret).clone();

                Ok(TypedExpr {
                    kind: TypedExprKind::Call {
                        callee: Box::new(callee),
                        arguments: typed_arguments,
                        opaque,
                    },
                    ty,
                    span: span.clone(),
                })
            }
            Expr::List(elements, span) => {
                let expected_element = match expected {
                    Some(TypeNode::List(element)) => Some((**element).clone()),
                    _ => None,
                };
                let fixed = expected_element.is_some();
                let mut element_type = expected_element;

                let mut typed_elements = vec![];
                for element in elements {
                    let typed = self.check_expr_expecting(element, element_type.as_ref())?;
                    element_type = merge_element(
                        element_type,
                        fixed,
                        &typed.ty,
                        ContainerKind::List,
                        &typed.span,
                    )?;
                    typed_elements.push(typed);
                }

                Ok(TypedExpr {
                    kind: TypedExprKind::List(typed_elements),
                    ty: TypeNode::List(Box::new(element_type.unwrap_or(TypeNode::Any))),
                    span: span.clone(),
                })
            }
            Expr::Tuple(elements, span) => {
                let expected_elements = match expected {
                    Some(TypeNode::Tuple(types)) if types.len() == elements.len() => {
                        Some(types.clone())
                    }
                    _ => None,
                };

                let mut typed_elements = vec![];
                for (index, element) in elements.iter().enumerate() {
                    let expected = expected_elements.as_ref().map(|types| types[index].clone());
                    typed_elements.push(self.check_expr_expecting(element, expected.as_ref())?);
                }

                let ty = TypeNode::Tuple(
                    typed_elements
                        .iter()
                        .map(|element| element.ty.clone())
                        .collect(),
                );
                Ok(TypedExpr {
                    kind: TypedExprKind::Tuple(typed_elements),
                    ty,
                    span: span.clone(),
                })
            }
            Expr::Dict(pairs, span) => {
                let (expected_key, expected_value) = match expected {
                    Some(TypeNode::Dict(key, value)) => {
                        (Some((**key).clone()), Some((**value).clone()))
                    }
                    _ => (None, None),
                };
                let fixed = expected_key.is_some();
                let mut key_type = expected_key;
                let mut value_type = expected_value;

                let mut typed_pairs = vec![];
                for (key, value) in pairs {
                    let key = self.check_expr_expecting(key, key_type.as_ref())?;
                    key_type =
                        merge_element(key_type, fixed, &key.ty, ContainerKind::Dict, &key.span)?;

                    let value = self.check_expr_expecting(value, value_type.as_ref())?;
                    value_type = merge_element(
                        value_type,
                        fixed,
                        &value.ty,
                        ContainerKind::Dict,
                        &value.span,
                    )?;

                    typed_pairs.push((key, value));
                }

                Ok(TypedExpr {
                    kind: TypedExprKind::Dict(typed_pairs),
                    ty: TypeNode::Dict(
                        Box::new(key_type.unwrap_or(TypeNode::Any)),
                        Box::new(value_type.unwrap_or(TypeNode::Any)),
                    ),
                    span: span.clone(),
                })
            }
        }
    }

    /// Looks a value name up, trying the environment chain, the method
    /// receiver, module functions and the runtime builtins in order.
    fn lookup_value(&self, name: &str) -> Result<Option<TypeNode>, Error> {
        if let Some(binding) = self.find_binding(name) {
            return Ok(Some(binding.ty.clone()));
        }

        if name == "self" {
            if let Some(context) = &self.class_context {
                return Ok(Some(TypeNode::Class(context.name.clone())));
            }
        }

        if let Some(function) = self.unit.get_function(name) {
            let signature = self.callable_signature(function)?;
            return Ok(Some(TypeNode::Callable(signature)));
        }

        Ok(self.globals.get(name).cloned())
    }

    /// Resolves a member access on a class instance through the gate.
    fn class_member(
        &self,
        class_name: &str,
        attribute: &str,
        span: &Span,
    ) -> Result<TypeNode, Error> {
        let context = match &self.class_context {
            Some(context) if context.name == class_name => context.clone(),
            _ => {
                let Some(class) = self.unit.get_class(class_name) else {
                    return Err(Error::new(
                        ErrorImpl::UnknownAttribute {
                            attribute: attribute.to_string(),
                            on: class_name.to_string(),
                        },
                        span.clone(),
                    ));
                };
                let flat = flatten_class(class, self.unit)?;
                self.build_context(&flat)?
            }
        };

        let Some(member) = context.flat.table.decision(attribute) else {
            return Err(Error::new(
                ErrorImpl::UnknownAttribute {
                    attribute: attribute.to_string(),
                    on: class_name.to_string(),
                },
                span.clone(),
            ));
        };

        let unknown = || {
            Error::new(
                ErrorImpl::UnknownAttribute {
                    attribute: attribute.to_string(),
                    on: class_name.to_string(),
                },
                span.clone(),
            )
        };

        match (member.decision, member.kind) {
            (MemberDecision::Ignored, MemberKind::Attribute) => Err(Error::new(
                ErrorImpl::IgnoredAttributeUse {
                    attribute: attribute.to_string(),
                },
                span.clone(),
            )),
            (MemberDecision::Ignored, MemberKind::Method) if member.from_ignore_set => {
                Err(Error::new(
                    ErrorImpl::IgnoredAttributeUse {
                        attribute: attribute.to_string(),
                    },
                    span.clone(),
                ))
            }
            (_, MemberKind::Method) => context
                .method_signatures
                .get(attribute)
                .cloned()
                .map(TypeNode::Callable)
                .ok_or_else(unknown),
            (MemberDecision::Compiled, MemberKind::Attribute) => context
                .attribute_types
                .get(attribute)
                .cloned()
                .ok_or_else(unknown),
        }
    }

    /// Whether a call through this callee crosses into host-only code.
    fn callee_is_opaque(&self, callee: &TypedExpr) -> bool {
        match &callee.kind {
            TypedExprKind::Name(name) => self
                .unit
                .get_function(name)
                .is_some_and(|function| function.is_ignored),
            TypedExprKind::Attribute { object, attribute } => {
                let TypeNode::Class(class_name) = &object.ty else {
                    return false;
                };

                if let Some(context) = &self.class_context {
                    if context.name == *class_name {
                        return context
                            .flat
                            .table
                            .decision(attribute)
                            .is_some_and(|member| member.decision == MemberDecision::Ignored);
                    }
                }

                self.unit
                    .get_class(class_name)
                    .and_then(|class| flatten_class(class, self.unit).ok())
                    .and_then(|flat| flat.table.decision(attribute).copied())
                    .is_some_and(|member| member.decision == MemberDecision::Ignored)
            }
            _ => false,
        }
    }
}

fn dotted_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name, _) => Some(name.clone()),
        Expr::Attribute {
            object, attribute, ..
        } => Some(format!("{}.{}", dotted_name(object)?, attribute)),
        _ => None,
    }
}

/// Folds one more element type into a container literal's running
/// element type. A declared element type is fixed; an inferred one
/// widens through unification.
fn merge_element(
    current: Option<TypeNode>,
    fixed: bool,
    ty: &TypeNode,
    kind: ContainerKind,
    span: &Span,
) -> Result<Option<TypeNode>, Error> {
    let Some(current) = current else {
        return Ok(Some(ty.clone()));
    };

    if fixed {
        if current.is_compatible_with(ty) {
            return Ok(Some(current));
        }
    } else if let Some(unified) = TypeNode::unify(&current, ty) {
        return Ok(Some(unified));
    }

    Err(Error::new(
        ErrorImpl::HeterogeneousContainer {
            kind,
            first: current.to_string(),
            second: ty.to_string(),
        },
        span.clone(),
    ))
}

/// Merges the bindings produced by the two arms of a conditional.
///
/// A binding changed in both arms unifies; a binding first declared in
/// only one arm survives as the optional of its type.
fn merge_branches(
    before: &HashMap<String, Binding>,
    then_vars: &HashMap<String, Binding>,
    else_vars: &HashMap<String, Binding>,
    span: &Span,
) -> Result<HashMap<String, Binding>, Error> {
    let mut names: Vec<&String> = then_vars.keys().chain(else_vars.keys()).collect();
    names.sort();
    names.dedup();

    let mut merged = HashMap::new();
    for name in names {
        let binding = match (then_vars.get(name), else_vars.get(name)) {
            (Some(then_binding), Some(else_binding)) => {
                if then_binding.ty == else_binding.ty {
                    then_binding.clone()
                } else {
                    let Some(ty) = TypeNode::unify(&then_binding.ty, &else_binding.ty) else {
                        return Err(Error::new(
                            ErrorImpl::TypeMismatch {
                                variable: name.clone(),
                                expected: then_binding.ty.to_string(),
                                received: else_binding.ty.to_string(),
                            },
                            span.clone(),
                        ));
                    };
                    Binding {
                        ty,
                        annotated: then_binding.annotated && else_binding.annotated,
                        span: then_binding.span.clone(),
                    }
                }
            }
            (Some(binding), None) | (None, Some(binding)) => {
                if before.contains_key(name) {
                    binding.clone()
                } else {
                    Binding {
                        ty: TypeNode::optional(binding.ty.clone()),
                        annotated: false,
                        span: binding.span.clone(),
                    }
                }
            }
            (None, None) => continue,
        };
        merged.insert(name.clone(), binding);
    }

    Ok(merged)
}
