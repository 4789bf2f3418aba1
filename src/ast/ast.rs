//! Compilation inputs supplied by the host embedding.
//!
//! The host lowers its dynamically-typed functions and classes into the
//! structures in this module; annotation strings are left unparsed and
//! are handled by the annotation parser during type checking.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::type_checker::typed_ast::TypedClass;
use crate::Span;

use super::statements::Stmt;

/// A function or method as supplied by the host.
///
/// `type_comment` carries the structured comment-form signature
/// (e.g. `"(number) -> number"`), used positionally for any parameter
/// without an inline annotation. `is_ignored` marks the function as
/// opaque to compilation: its body is never compiled, but its declared
/// signature still participates in type checking at the call boundary.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_annotation: Option<String>,
    pub type_comment: Option<String>,
    pub body: Vec<Stmt>,
    pub is_ignored: bool,
    pub span: Span,
}

impl Function {
    pub fn new(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Function {
        Function {
            name: name.to_string(),
            params,
            return_annotation: None,
            type_comment: None,
            body,
            is_ignored: false,
            span: Span::null(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Option<String>,
    pub span: Span,
}

impl Param {
    pub fn new(name: &str, annotation: Option<&str>) -> Param {
        Param {
            name: name.to_string(),
            annotation: annotation.map(String::from),
            span: Span::null(),
        }
    }
}

/// A class-level data attribute.
///
/// Attributes without an annotation default to `Tensor`, matching the
/// runtime's convention for unannotated bindings.
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    pub name: String,
    pub annotation: Option<String>,
    pub span: Span,
}

impl AttributeDecl {
    pub fn new(name: &str, annotation: Option<&str>) -> AttributeDecl {
        AttributeDecl {
            name: name.to_string(),
            annotation: annotation.map(String::from),
            span: Span::null(),
        }
    }
}

/// A class as supplied by the host.
///
/// `ignored_attributes` is the caller-declared ignore set: members named
/// here are excluded from compiled-graph construction entirely and may
/// not be referenced from compiled code.
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub bases: Vec<String>,
    pub attributes: Vec<AttributeDecl>,
    pub methods: Vec<Function>,
    pub ignored_attributes: Vec<String>,
    pub span: Span,
}

impl Class {
    pub fn new(name: &str) -> Class {
        Class {
            name: name.to_string(),
            bases: vec![],
            attributes: vec![],
            methods: vec![],
            ignored_attributes: vec![],
            span: Span::null(),
        }
    }
}

/// The module-level scope a unit of compilation runs against.
///
/// Holds the classes and functions registered by the host, and caches
/// compiled classes so subsequent compilations can share them read-only.
#[derive(Debug)]
pub struct CompilationUnit {
    pub name: Rc<String>,
    classes: HashMap<String, Class>,
    functions: HashMap<String, Function>,
    compiled_classes: RefCell<HashMap<String, Rc<TypedClass>>>,
}

impl CompilationUnit {
    pub fn new(name: &str) -> CompilationUnit {
        CompilationUnit {
            name: Rc::new(name.to_string()),
            classes: HashMap::new(),
            functions: HashMap::new(),
            compiled_classes: RefCell::new(HashMap::new()),
        }
    }

    pub fn add_class(&mut self, class: Class) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn cache_class(&self, class: Rc<TypedClass>) {
        self.compiled_classes
            .borrow_mut()
            .insert(class.name.clone(), class);
    }

    pub fn cached_class(&self, name: &str) -> Option<Rc<TypedClass>> {
        self.compiled_classes.borrow().get(name).cloned()
    }
}
