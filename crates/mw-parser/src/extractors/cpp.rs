//! C++ class extractor.
//!
//! Walks the top level of a header, descending into namespaces (nested,
//! inline and anonymous), `extern "C++"` blocks, include guards and
//! template declarations, and hands every class definition to
//! [`processors::classes::process_class`].

mod processors;

#[cfg(test)]
mod tests;

use ast_grep_core::Node;
use ast_grep_language::SupportLang;

use crate::tree::ClassNode;

use processors::classes::{Scope, process_class};
use processors::templates::template_params;

/// Extract every class definition of the tree, in source order. Nested
/// classes follow their enclosing class.
pub fn extract<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
) -> Vec<ClassNode> {
    let mut classes = Vec::new();
    collect_scope(&root.root(), &Scope::default(), &mut classes);
    classes
}

fn collect_scope<D: ast_grep_core::Doc>(
    node: &Node<D>,
    scope: &Scope,
    classes: &mut Vec<ClassNode>,
) {
    for child in node.children() {
        dispatch_cpp_node(&child, scope, classes);
    }
}

fn dispatch_cpp_node<D: ast_grep_core::Doc>(
    child: &Node<D>,
    scope: &Scope,
    classes: &mut Vec<ClassNode>,
) {
    match child.kind().as_ref() {
        "namespace_definition" => {
            let names = namespace_names(child);
            if let Some(body) = child.field("body") {
                collect_scope(&body, &scope.enter_namespace(&names), classes);
            }
        }
        "linkage_specification" => {
            if let Some(body) = child.field("body") {
                if body.kind().as_ref() == "declaration_list" {
                    collect_scope(&body, scope, classes);
                } else {
                    dispatch_cpp_node(&body, scope, classes);
                }
            }
        }
        "template_declaration" => {
            let params = child
                .children()
                .find(|c| c.kind().as_ref() == "template_parameter_list")
                .map(|list| template_params(&list))
                .unwrap_or_default();
            for inner in child.children() {
                if matches!(inner.kind().as_ref(), "class_specifier" | "struct_specifier") {
                    process_class(&inner, scope, params.clone(), classes);
                }
            }
        }
        "class_specifier" | "struct_specifier" => {
            process_class(child, scope, Vec::new(), classes);
        }
        "declaration" | "type_definition" => {
            // `class Foo { ... } foo;`
            for inner in child.children() {
                if matches!(inner.kind().as_ref(), "class_specifier" | "struct_specifier") {
                    process_class(&inner, scope, Vec::new(), classes);
                }
            }
        }
        "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
            collect_scope(child, scope, classes);
        }
        _ => {}
    }
}

/// `namespace a::b` yields `[a, b]`; anonymous namespaces add nothing.
fn namespace_names<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<String> {
    node.field("name")
        .map(|name| {
            name.text()
                .split("::")
                .map(|part| {
                    let part = part.trim();
                    part.strip_prefix("inline ").unwrap_or(part).trim().to_string()
                })
                .filter(|part| !part.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
