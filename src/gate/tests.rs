use crate::ast::ast::{AttributeDecl, Class, CompilationUnit, Function};

use super::gate::{flatten_class, MemberDecision, MemberKind};

fn module_class() -> Class {
    let mut class = Class::new("Module");
    class
        .attributes
        .push(AttributeDecl::new("weight", Some("Tensor")));
    class
        .methods
        .push(Function::new("forward", vec![], vec![]));
    class
}

#[test]
fn test_plain_members_are_compiled() {
    let unit = CompilationUnit::new("module");
    let flat = flatten_class(&module_class(), &unit).unwrap();

    let member = flat.table.decision("weight").unwrap();
    assert_eq!(member.decision, MemberDecision::Compiled);
    assert_eq!(member.kind, MemberKind::Attribute);

    let member = flat.table.decision("forward").unwrap();
    assert_eq!(member.decision, MemberDecision::Compiled);
    assert_eq!(member.kind, MemberKind::Method);

    assert!(flat.table.decision("missing").is_none());
}

#[test]
fn test_ignore_set_marks_attribute() {
    let mut class = module_class();
    class
        .attributes
        .push(AttributeDecl::new("sub", Some("Module")));
    class.ignored_attributes.push(String::from("sub"));

    let unit = CompilationUnit::new("module");
    let flat = flatten_class(&class, &unit).unwrap();

    let member = flat.table.decision("sub").unwrap();
    assert_eq!(member.decision, MemberDecision::Ignored);
    assert!(member.from_ignore_set);
}

#[test]
fn test_marked_method_is_ignored() {
    let mut class = module_class();
    let mut method = Function::new("host_only", vec![], vec![]);
    method.is_ignored = true;
    class.methods.push(method);

    let unit = CompilationUnit::new("module");
    let flat = flatten_class(&class, &unit).unwrap();

    let member = flat.table.decision("host_only").unwrap();
    assert_eq!(member.decision, MemberDecision::Ignored);
    assert!(!member.from_ignore_set);
}

#[test]
fn test_base_members_are_inherited() {
    let mut unit = CompilationUnit::new("module");
    unit.add_class(module_class());

    let mut derived = Class::new("Derived");
    derived.bases.push(String::from("Module"));
    derived
        .methods
        .push(Function::new("extra", vec![], vec![]));

    let flat = flatten_class(&derived, &unit).unwrap();
    assert!(flat.table.decision("weight").is_some());
    assert!(flat.table.decision("forward").is_some());
    assert!(flat.table.decision("extra").is_some());
}

#[test]
fn test_derived_definition_replaces_base() {
    let mut unit = CompilationUnit::new("module");
    unit.add_class(module_class());

    let mut derived = Class::new("Derived");
    derived.bases.push(String::from("Module"));
    derived
        .attributes
        .push(AttributeDecl::new("weight", Some("Optional[Tensor]")));

    let flat = flatten_class(&derived, &unit).unwrap();
    let weight = flat
        .attributes
        .iter()
        .find(|attribute| attribute.name == "weight")
        .unwrap();
    assert_eq!(weight.annotation.as_deref(), Some("Optional[Tensor]"));
    assert_eq!(flat.attributes.len(), 1);
}

#[test]
fn test_ignore_sets_union_across_bases() {
    let mut base = module_class();
    base.ignored_attributes.push(String::from("weight"));

    let mut unit = CompilationUnit::new("module");
    unit.add_class(base);

    let mut derived = Class::new("Derived");
    derived.bases.push(String::from("Module"));

    let flat = flatten_class(&derived, &unit).unwrap();
    let member = flat.table.decision("weight").unwrap();
    assert_eq!(member.decision, MemberDecision::Ignored);
    assert!(member.from_ignore_set);
}

#[test]
fn test_unknown_base_fails() {
    let mut derived = Class::new("Derived");
    derived.bases.push(String::from("Missing"));

    let unit = CompilationUnit::new("module");
    let error = flatten_class(&derived, &unit).err().unwrap();
    assert_eq!(error.get_error_name(), "UnresolvedTypeName");
}
