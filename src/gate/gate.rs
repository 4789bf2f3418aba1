use std::collections::HashMap;

use crate::{
    ast::ast::{AttributeDecl, Class, CompilationUnit, Function},
    errors::errors::{Error, ErrorImpl},
};

/// Whether a member participates in compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberDecision {
    Compiled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Attribute,
    Method,
}

/// The gate's decision for a single member.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    pub decision: MemberDecision,
    pub kind: MemberKind,
    pub from_ignore_set: bool,
}

/// Per-member decisions for a flattened class.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    members: HashMap<String, Member>,
}

impl MemberTable {
    pub fn insert(&mut self, name: &str, member: Member) {
        self.members.insert(name.to_string(), member);
    }

    pub fn decision(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }
}

/// A class hierarchy flattened into one member view.
#[derive(Debug, Clone)]
pub struct FlatClass {
    pub name: String,
    pub attributes: Vec<AttributeDecl>,
    pub methods: Vec<Function>,
    pub table: MemberTable,
}

/// Flattens a class and its bases into a single member view.
///
/// Base members are collected first so a derived definition replaces a
/// base definition of the same name; ignore sets are unioned across the
/// hierarchy. A base name the unit does not know fails resolution.
pub fn flatten_class(class: &Class, unit: &CompilationUnit) -> Result<FlatClass, Error> {
    let mut attributes: Vec<AttributeDecl> = vec![];
    let mut methods: Vec<Function> = vec![];
    let mut ignore_set: Vec<String> = vec![];

    collect(class, unit, &mut attributes, &mut methods, &mut ignore_set)?;

    let mut table = MemberTable::default();
    for attribute in &attributes {
        let from_ignore_set = ignore_set.contains(&attribute.name);
        table.insert(
            &attribute.name,
            Member {
                decision: if from_ignore_set {
                    MemberDecision::Ignored
                } else {
                    MemberDecision::Compiled
                },
                kind: MemberKind::Attribute,
                from_ignore_set,
            },
        );
    }
    for method in &methods {
        let from_ignore_set = ignore_set.contains(&method.name);
        table.insert(
            &method.name,
            Member {
                decision: if from_ignore_set || method.is_ignored {
                    MemberDecision::Ignored
                } else {
                    MemberDecision::Compiled
                },
                kind: MemberKind::Method,
                from_ignore_set,
            },
        );
    }

    Ok(FlatClass {
        name: class.name.clone(),
        attributes,
        methods,
        table,
    })
}

fn collect(
    class: &Class,
    unit: &CompilationUnit,
    attributes: &mut Vec<AttributeDecl>,
    methods: &mut Vec<Function>,
    ignore_set: &mut Vec<String>,
) -> Result<(), Error> {
    for base_name in &class.bases {
        let Some(base) = unit.get_class(base_name) else {
            return Err(Error::new(
                ErrorImpl::UnresolvedTypeName {
                    name: base_name.clone(),
                },
                class.span.clone(),
            ));
        };
        collect(base, unit, attributes, methods, ignore_set)?;
    }

    for attribute in &class.attributes {
        attributes.retain(|existing| existing.name != attribute.name);
        attributes.push(attribute.clone());
    }
    for method in &class.methods {
        methods.retain(|existing| existing.name != method.name);
        methods.push(method.clone());
    }
    for name in &class.ignored_attributes {
        if !ignore_set.contains(name) {
            ignore_set.push(name.clone());
        }
    }

    Ok(())
}
