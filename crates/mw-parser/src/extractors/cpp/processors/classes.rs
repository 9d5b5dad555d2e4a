//! Class processing: names, bases, bodies and nested classes.

use ast_grep_core::Node;
use mw_core::{Access, TemplateParam};

use crate::tree::{BaseSpecifier, ClassKind, ClassNode};

use super::helpers::{child_of_kind, line_of, split_template_args, squash};
use super::members::scan_body;

/// Where a class is declared.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub namespace: Vec<String>,
    /// Namespaces followed by enclosing classes.
    pub path: Vec<String>,
}

impl Scope {
    #[must_use]
    pub(crate) fn enter_namespace(&self, names: &[String]) -> Self {
        let mut next = self.clone();
        next.namespace.extend(names.iter().cloned());
        next.path.extend(names.iter().cloned());
        next
    }

    fn enter_class(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.path.push(name.to_string());
        next
    }

    fn qualify(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}::{name}", self.path.join("::"))
        }
    }
}

/// Process a `class_specifier`/`struct_specifier` with a body, then every
/// class nested in it. Forward declarations and explicit specializations
/// are skipped.
pub(crate) fn process_class<D: ast_grep_core::Doc>(
    node: &Node<D>,
    scope: &Scope,
    template_params: Vec<TemplateParam>,
    classes: &mut Vec<ClassNode>,
) {
    let Some(body) = child_of_kind(node, "field_declaration_list") else {
        return;
    };
    let Some(name_node) = node.field("name") else {
        tracing::debug!(line = line_of(node), "skipping anonymous class");
        return;
    };
    if name_node.kind().as_ref() == "template_type" {
        tracing::debug!(
            class = %name_node.text(),
            "skipping explicit template specialization"
        );
        return;
    }
    let name_text = name_node.text();
    let name = name_text.rsplit("::").next().unwrap_or_default().trim().to_string();

    let kind = if node.kind().as_ref() == "struct_specifier" {
        ClassKind::Struct
    } else {
        ClassKind::Class
    };
    let is_final = node
        .children()
        .any(|c| c.kind().as_ref() == "virtual_specifier" && c.text().as_ref() == "final");
    let bases = child_of_kind(node, "base_class_clause")
        .map(|clause| extract_bases(&clause, kind.default_access()))
        .unwrap_or_default();

    let scan = scan_body(&body, &name, kind.default_access());
    tracing::debug!(
        class = %scope.qualify(&name),
        members = scan.members.len(),
        bases = bases.len(),
        "extracted class"
    );

    classes.push(ClassNode {
        qualified_name: scope.qualify(&name),
        namespace: scope.namespace.clone(),
        scope: scope.path.clone(),
        kind,
        template_params,
        bases,
        members: scan.members,
        is_qobject: scan.is_qobject,
        is_final,
        line: line_of(node),
        name: name.clone(),
    });

    let inner = scope.enter_class(&name);
    for nested in scan.nested {
        process_class(&nested.node, &inner, nested.template_params, classes);
    }
}

/// Base specifiers in declaration order.
///
/// Access keywords and `virtual` precede the base name; a comma closes
/// the specifier.
fn extract_bases<D: ast_grep_core::Doc>(clause: &Node<D>, default_access: Access) -> Vec<BaseSpecifier> {
    let mut bases = Vec::new();
    let mut access = None;
    let mut is_virtual = false;
    for child in clause.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "type_identifier" | "qualified_identifier" | "template_type" => {
                let spelling = squash(&child.text());
                let (name, template_args) = split_template_args(&spelling);
                bases.push(BaseSpecifier {
                    spelling,
                    name,
                    template_args,
                    access: access.unwrap_or(default_access),
                    is_virtual,
                    resolved: None,
                });
            }
            "," => {
                access = None;
                is_virtual = false;
            }
            _ => {
                let text = child.text();
                match text.trim() {
                    "virtual" => is_virtual = true,
                    other => {
                        if let Ok(parsed) = other.parse::<Access>() {
                            access = Some(parsed);
                        }
                    }
                }
            }
        }
    }
    bases
}
