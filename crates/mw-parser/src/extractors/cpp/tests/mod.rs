use ast_grep_language::LanguageExt;

use super::*;
pub(super) use crate::tree::{ClassKind, MemberNode, MethodNode};
pub(super) use mw_core::{Access, RefQualifier, TemplateParamKind};

mod inheritance_tests;

fn parse_and_extract(source: &str) -> Vec<ClassNode> {
    let hidden = crate::preprocess::hide_framework_macros(source);
    let root = SupportLang::Cpp.ast_grep(&hidden);
    extract(&root)
}

fn find_by_name<'a>(classes: &'a [ClassNode], qualified_name: &str) -> &'a ClassNode {
    classes
        .iter()
        .find(|c| c.qualified_name == qualified_name)
        .unwrap_or_else(|| {
            let available: Vec<_> = classes.iter().map(|c| c.qualified_name.as_str()).collect();
            panic!(
                "class {qualified_name:?} not found. Available classes:\n{}",
                available.join("\n")
            );
        })
}

fn find_method<'a>(class: &'a ClassNode, name: &str) -> &'a MethodNode {
    class.methods().find(|m| m.name == name).unwrap_or_else(|| {
        let available: Vec<_> = class.methods().map(|m| m.name.as_str()).collect();
        panic!(
            "method {name:?} not found in {}. Available methods:\n{}",
            class.qualified_name,
            available.join("\n")
        );
    })
}

fn find_all_methods<'a>(class: &'a ClassNode, name: &str) -> Vec<&'a MethodNode> {
    class.methods().filter(|m| m.name == name).collect()
}

fn param_strings(method: &MethodNode) -> Vec<String> {
    method.params.iter().map(ToString::to_string).collect()
}

#[test]
fn empty_source_has_no_classes() {
    assert_eq!(parse_and_extract("").len(), 0);
}

#[test]
fn forward_declarations_are_skipped() {
    let classes = parse_and_extract("class Foo;\nstruct Bar;\n");
    assert!(classes.is_empty());
}
