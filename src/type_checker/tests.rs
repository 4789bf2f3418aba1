use std::rc::Rc;

use crate::ast::ast::{AttributeDecl, Class, CompilationUnit, Function, Param};
use crate::ast::expressions::Expr;
use crate::ast::statements::Stmt;
use crate::ast::types::{Primitive, TypeNode};
use crate::Span;

use super::type_checker::{type_check_class, type_check_function};
use super::typed_ast::{TypedExprKind, TypedStmt};

fn int(value: i64) -> Expr {
    Expr::Int(value, Span::null())
}

fn float(value: f64) -> Expr {
    Expr::Float(value, Span::null())
}

fn string(value: &str) -> Expr {
    Expr::Str(String::from(value), Span::null())
}

#[test]
fn test_unannotated_param_defaults_to_tensor() {
    let unit = CompilationUnit::new("module");
    let function = Function::new("forward", vec![Param::new("x", None)], vec![]);

    let typed = type_check_function(&function, &unit).unwrap();
    assert_eq!(typed.params[0], (String::from("x"), TypeNode::Tensor));
}

#[test]
fn test_annotated_param_is_resolved() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "forward",
        vec![Param::new("x", Some("Optional[int]"))],
        vec![],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    assert_eq!(
        typed.params[0].1,
        TypeNode::Optional(Box::new(TypeNode::Primitive(Primitive::Int)))
    );
}

#[test]
fn test_annotated_assignment() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign("x", Some("Optional[int]"), int(7))],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[0] {
        TypedStmt::Assign { annotated, ty, .. } => {
            assert!(*annotated);
            assert_eq!(
                *ty,
                TypeNode::Optional(Box::new(TypeNode::Primitive(Primitive::Int)))
            );
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_annotation_value_mismatch() {
    let unit = CompilationUnit::new("module");
    let function = Function::new("f", vec![], vec![Stmt::assign("x", Some("str"), int(4))]);

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert!(error.get_error().to_string().contains("annotated with type"));
}

#[test]
fn test_annotating_existing_variable_fails() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("x", None, int(5)),
            Stmt::assign("x", Some("Optional[int]"), int(7)),
        ],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "Redeclaration");
    assert!(error
        .get_error()
        .to_string()
        .contains("declare and annotate"));
}

#[test]
fn test_reassignment_unifies_numerics() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("x", None, int(5)),
            Stmt::assign("x", None, float(0.5)),
        ],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[1] {
        TypedStmt::Assign { ty, .. } => {
            assert_eq!(*ty, TypeNode::Primitive(Primitive::Float));
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_reassignment_incompatible_fails() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("x", None, int(5)),
            Stmt::assign("x", None, string("five")),
        ],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_heterogeneous_list_literal() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign(
            "mixed",
            None,
            Expr::List(vec![int(1), string("two")], Span::null()),
        )],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "HeterogeneousContainer");
    assert!(error
        .get_error()
        .to_string()
        .contains("Lists must contain only a single type"));
}

#[test]
fn test_list_annotation_fixes_element_type() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign(
            "wrong",
            Some("List[int]"),
            Expr::List(vec![float(0.5)], Span::null()),
        )],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "HeterogeneousContainer");
}

#[test]
fn test_empty_list_takes_annotated_type() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign(
            "a",
            Some("List[int]"),
            Expr::List(vec![], Span::null()),
        )],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[0] {
        TypedStmt::Assign { value, .. } => {
            assert_eq!(
                value.ty,
                TypeNode::List(Box::new(TypeNode::Primitive(Primitive::Int)))
            );
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_branch_only_variable_becomes_optional() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![Param::new("flag", Some("bool"))],
        vec![
            Stmt::If {
                condition: Expr::name("flag"),
                then_body: vec![Stmt::assign("y", None, int(1))],
                else_body: vec![],
                span: Span::null(),
            },
            Stmt::assign("z", None, Expr::name("y")),
        ],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[1] {
        TypedStmt::Assign { ty, .. } => {
            assert_eq!(
                *ty,
                TypeNode::Optional(Box::new(TypeNode::Primitive(Primitive::Int)))
            );
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_branches_unify() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![Param::new("flag", Some("bool"))],
        vec![
            Stmt::If {
                condition: Expr::name("flag"),
                then_body: vec![Stmt::assign("y", None, int(1))],
                else_body: vec![Stmt::assign("y", None, float(2.0))],
                span: Span::null(),
            },
            Stmt::assign("z", None, Expr::name("y")),
        ],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[1] {
        TypedStmt::Assign { ty, .. } => {
            assert_eq!(*ty, TypeNode::Primitive(Primitive::Float));
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_loop_reassignment_widens() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("x", None, int(0)),
            Stmt::Loop {
                body: vec![Stmt::assign("x", None, float(0.5))],
                span: Span::null(),
            },
            Stmt::assign("y", None, Expr::name("x")),
        ],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[2] {
        TypedStmt::Assign { ty, .. } => {
            assert_eq!(*ty, TypeNode::Primitive(Primitive::Float));
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_return_type_checked() {
    let unit = CompilationUnit::new("module");
    let mut function = Function::new(
        "f",
        vec![],
        vec![Stmt::Return {
            value: Some(string("nope")),
            span: Span::null(),
        }],
    );
    function.return_annotation = Some(String::from("int"));

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "ReturnTypeMismatch");
}

#[test]
fn test_return_type_inferred() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::Return {
            value: Some(int(3)),
            span: Span::null(),
        }],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    assert_eq!(typed.return_type, TypeNode::Primitive(Primitive::Int));
}

#[test]
fn test_undeclared_variable() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::expression(Expr::name("ghost"))],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_call_to_runtime_builtin() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign(
            "t",
            None,
            Expr::call(
                Expr::attribute(Expr::name("torch"), "ones"),
                vec![int(2), int(2)],
            ),
        )],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[0] {
        TypedStmt::Assign { ty, .. } => assert_eq!(*ty, TypeNode::Tensor),
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_call_argument_type_checked() {
    let mut unit = CompilationUnit::new("module");
    let mut ignored = Function::new("host_helper", vec![Param::new("my_arg", None)], vec![]);
    ignored.type_comment = Some(String::from("(number) -> number"));
    ignored.is_ignored = true;
    unit.add_function(ignored);

    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::expression(Expr::call(
            Expr::name("host_helper"),
            vec![string("two")],
        ))],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "ArgumentType");
    assert!(error.get_error().to_string().contains("argument 'my_arg'"));
}

#[test]
fn test_call_to_ignored_function_is_opaque() {
    let mut unit = CompilationUnit::new("module");
    let mut ignored = Function::new("host_helper", vec![Param::new("my_arg", None)], vec![]);
    ignored.type_comment = Some(String::from("(number) -> number"));
    ignored.is_ignored = true;
    unit.add_function(ignored);

    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::assign(
            "x",
            None,
            Expr::call(Expr::name("host_helper"), vec![int(2)]),
        )],
    );

    let typed = type_check_function(&function, &unit).unwrap();
    match &typed.body[0] {
        TypedStmt::Assign { value, ty, .. } => {
            assert_eq!(*ty, TypeNode::Primitive(Primitive::Scalar));
            match &value.kind {
                TypedExprKind::Call { opaque, .. } => assert!(*opaque),
                other => panic!("expected a call, found {:?}", other),
            }
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_call_arity_checked() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![Stmt::expression(Expr::call(
            Expr::attribute(Expr::name("torch"), "tensor"),
            vec![int(1), int(2)],
        ))],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedArguments");
}

#[test]
fn test_not_callable() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("x", None, int(1)),
            Stmt::expression(Expr::call(Expr::name("x"), vec![])),
        ],
    );

    let error = type_check_function(&function, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "NotCallable");
}

#[test]
fn test_list_append_property() {
    let unit = CompilationUnit::new("module");
    let function = Function::new(
        "f",
        vec![],
        vec![
            Stmt::assign("a", Some("List[int]"), Expr::List(vec![], Span::null())),
            Stmt::expression(Expr::call(
                Expr::attribute(Expr::name("a"), "append"),
                vec![int(4)],
            )),
        ],
    );

    assert!(type_check_function(&function, &unit).is_ok());
}

#[test]
fn test_class_attribute_access() {
    let mut unit = CompilationUnit::new("module");
    let mut class = Class::new("Module");
    class
        .attributes
        .push(AttributeDecl::new("weight", Some("Tensor")));
    class.methods.push(Function::new(
        "forward",
        vec![],
        vec![Stmt::Return {
            value: Some(Expr::attribute(Expr::name("self"), "weight")),
            span: Span::null(),
        }],
    ));
    unit.add_class(class);

    let class = unit.get_class("Module").unwrap().clone();
    let typed = type_check_class(&class, &unit).unwrap();
    assert_eq!(typed.methods[0].return_type, TypeNode::Tensor);
}

#[test]
fn test_ignored_attribute_reference_fails() {
    let mut unit = CompilationUnit::new("module");
    let mut class = Class::new("Module");
    class.attributes.push(AttributeDecl::new("sub", None));
    class.ignored_attributes.push(String::from("sub"));
    class.methods.push(Function::new(
        "forward",
        vec![],
        vec![Stmt::expression(Expr::attribute(Expr::name("self"), "sub"))],
    ));
    unit.add_class(class);

    let class = unit.get_class("Module").unwrap().clone();
    let error = type_check_class(&class, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "IgnoredAttributeUse");
    assert!(error
        .get_error()
        .to_string()
        .contains("attribute was ignored during compilation"));
}

#[test]
fn test_ignored_method_callable_as_boundary() {
    let mut unit = CompilationUnit::new("module");
    let mut class = Class::new("Module");
    let mut host_only = Function::new("lookup", vec![Param::new("key", Some("str"))], vec![]);
    host_only.return_annotation = Some(String::from("int"));
    host_only.is_ignored = true;
    class.methods.push(host_only);
    class.methods.push(Function::new(
        "forward",
        vec![],
        vec![Stmt::Return {
            value: Some(Expr::call(
                Expr::attribute(Expr::name("self"), "lookup"),
                vec![string("weight")],
            )),
            span: Span::null(),
        }],
    ));
    unit.add_class(class);

    let class = unit.get_class("Module").unwrap().clone();
    let typed = type_check_class(&class, &unit).unwrap();

    // The ignored method is absent from the IR but its boundary call
    // type checks and is marked opaque
    assert_eq!(typed.methods.len(), 1);
    match &typed.methods[0].body[0] {
        TypedStmt::Return { value: Some(value), .. } => match &value.kind {
            TypedExprKind::Call { opaque, .. } => assert!(*opaque),
            other => panic!("expected a call, found {:?}", other),
        },
        other => panic!("expected a return, found {:?}", other),
    }
}

#[test]
fn test_unknown_attribute() {
    let mut unit = CompilationUnit::new("module");
    let mut class = Class::new("Module");
    class.methods.push(Function::new(
        "forward",
        vec![],
        vec![Stmt::expression(Expr::attribute(
            Expr::name("self"),
            "missing",
        ))],
    ));
    unit.add_class(class);

    let class = unit.get_class("Module").unwrap().clone();
    let error = type_check_class(&class, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "UnknownAttribute");
}

// The enclosing class's own name must resolve lexically inside its
// member annotations even when the unit never registered the class
#[test]
fn test_class_annotations_see_enclosing_class_name() {
    let unit = CompilationUnit::new("module");

    let mut class = Class::new("Module");
    class
        .attributes
        .push(AttributeDecl::new("peer", Some("Optional[Module]")));
    class.methods.push(Function::new(
        "forward",
        vec![Param::new("other", Some("Module"))],
        vec![],
    ));

    let typed = type_check_class(&class, &unit).unwrap();
    assert_eq!(
        typed.attributes[0].1,
        TypeNode::Optional(Box::new(TypeNode::Class(String::from("Module"))))
    );
    assert_eq!(
        typed.methods[0].params[0].1,
        TypeNode::Class(String::from("Module"))
    );
}

#[test]
fn test_class_results_are_cached() {
    let mut unit = CompilationUnit::new("module");
    unit.add_class(Class::new("Module"));

    let class = unit.get_class("Module").unwrap().clone();
    let first = type_check_class(&class, &unit).unwrap();
    let second = type_check_class(&class, &unit).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
}
