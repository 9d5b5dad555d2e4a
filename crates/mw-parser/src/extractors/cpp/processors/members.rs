//! Member declarations of a class body.

use ast_grep_core::Node;
use mw_core::{Access, Qualifiers, RefQualifier, TemplateParam, TypeRef};

use crate::preprocess::{Marker, inline_prefix_markers, parse_marker};
use crate::tree::{AliasNode, CtorNode, DtorNode, MemberNode, MethodNode};

use super::declarators::{
    declarator_tokens, find_function_declarator, parameter_types, specifier_tokens,
};
use super::helpers::{
    child_of_kind, find_identifier_recursive, has_child_text, line_of, normalize_operator,
    split_template_args, squash,
};
use super::templates::template_params;

/// A class definition found inside another class body.
pub(super) struct NestedClass<'r, D: ast_grep_core::Doc> {
    pub node: Node<'r, D>,
    pub template_params: Vec<TemplateParam>,
}

/// Everything found in one `field_declaration_list`.
pub(super) struct BodyScan<'r, D: ast_grep_core::Doc> {
    pub members: Vec<MemberNode>,
    pub is_qobject: bool,
    pub nested: Vec<NestedClass<'r, D>>,
}

struct ScanState {
    class_name: String,
    access: Access,
    section: Option<String>,
    pending: Vec<String>,
}

/// Walk a class body in source order.
pub(super) fn scan_body<'r, D: ast_grep_core::Doc>(
    body: &Node<'r, D>,
    class_name: &str,
    default_access: Access,
) -> BodyScan<'r, D> {
    let mut scan = BodyScan {
        members: Vec::new(),
        is_qobject: false,
        nested: Vec::new(),
    };
    let mut state = ScanState {
        class_name: class_name.to_string(),
        access: default_access,
        section: None,
        pending: Vec::new(),
    };
    scan_children(body, &mut state, &mut scan);
    scan
}

fn scan_children<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    state: &mut ScanState,
    scan: &mut BodyScan<'r, D>,
) {
    for child in node.children() {
        match child.kind().as_ref() {
            "access_specifier" => {
                let text = child.text();
                if let Ok(access) = text.trim().trim_end_matches(':').parse::<Access>() {
                    state.access = access;
                }
                state.section = None;
                state.pending.clear();
            }
            "comment" => match parse_marker(&child.text()) {
                Some(Marker::Section(section)) => state.section = Some(section),
                Some(Marker::Prefix(prefix)) => state.pending.push(prefix),
                Some(Marker::Object) => scan.is_qobject = true,
                Some(Marker::Ignored(_)) | None => {}
            },
            "field_declaration"
            | "declaration"
            | "function_definition"
            | "operator_cast_declaration"
            | "operator_cast_definition" => {
                collect_nested_specifiers(&child, Vec::new(), scan);
                if let Some(member) = member_from_declaration(&child, state, false) {
                    scan.members.push(member);
                }
                state.pending.clear();
            }
            "template_declaration" => {
                scan_template_member(&child, state, scan);
                state.pending.clear();
            }
            "alias_declaration" => {
                if let Some(alias) = alias_from_declaration(&child, state.access, Vec::new()) {
                    scan.members.push(MemberNode::Alias(alias));
                }
            }
            "type_definition" => {
                scan.members.extend(aliases_from_typedef(&child, state.access));
            }
            "using_declaration" => {
                if let Some(member) = member_from_using(&child, state.access) {
                    scan.members.push(member);
                }
            }
            "class_specifier" | "struct_specifier" => {
                push_nested(&child, Vec::new(), scan);
            }
            "friend_declaration" => state.pending.clear(),
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
                scan_children(&child, state, scan);
            }
            _ => {}
        }
    }
}

fn scan_template_member<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    state: &ScanState,
    scan: &mut BodyScan<'r, D>,
) {
    let params = child_of_kind(node, "template_parameter_list")
        .map(|list| template_params(&list))
        .unwrap_or_default();
    for inner in node.children() {
        match inner.kind().as_ref() {
            "class_specifier" | "struct_specifier" => push_nested(&inner, params.clone(), scan),
            "alias_declaration" => {
                if let Some(alias) = alias_from_declaration(&inner, state.access, params.clone()) {
                    scan.members.push(MemberNode::Alias(alias));
                }
            }
            "field_declaration" | "declaration" | "function_definition" => {
                if let Some(member) = member_from_declaration(&inner, state, true) {
                    scan.members.push(member);
                }
            }
            _ => {}
        }
    }
}

fn push_nested<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    template_params: Vec<TemplateParam>,
    scan: &mut BodyScan<'r, D>,
) {
    if child_of_kind(node, "field_declaration_list").is_some() {
        scan.nested.push(NestedClass {
            node: node.clone(),
            template_params,
        });
    }
}

/// tree-sitter wraps `class Inner { ... };` in a `field_declaration`.
fn collect_nested_specifiers<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    template_params: Vec<TemplateParam>,
    scan: &mut BodyScan<'r, D>,
) {
    for inner in node.children() {
        if matches!(inner.kind().as_ref(), "class_specifier" | "struct_specifier") {
            push_nested(&inner, template_params.clone(), scan);
        }
    }
}

// ── Functions ──────────────────────────────────────────────────────

/// Qualifiers and specifiers read off a function declarator.
#[allow(clippy::struct_excessive_bools)]
#[derive(Default)]
struct DeclaratorInfo {
    params: Vec<TypeRef>,
    qualifiers: Qualifiers,
    is_override: bool,
    is_final: bool,
    is_noexcept: bool,
    trailing_return: Option<String>,
}

fn declarator_info<D: ast_grep_core::Doc>(declarator: &Node<D>) -> DeclaratorInfo {
    let mut info = DeclaratorInfo::default();
    let mut after_params = false;
    for child in declarator.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "parameter_list" => {
                info.params = parameter_types(&child);
                after_params = true;
            }
            "type_qualifier" if after_params => match child.text().as_ref() {
                "const" => info.qualifiers.is_const = true,
                "volatile" => info.qualifiers.is_volatile = true,
                _ => {}
            },
            "ref_qualifier" | "&" | "&&" if after_params => {
                info.qualifiers.ref_qualifier = match child.text().as_ref() {
                    "&&" => RefQualifier::Rvalue,
                    _ => RefQualifier::Lvalue,
                };
            }
            "virtual_specifier" => match child.text().as_ref() {
                "override" => info.is_override = true,
                "final" => info.is_final = true,
                _ => {}
            },
            "noexcept" => info.is_noexcept = true,
            "trailing_return_type" => {
                let text = child.text();
                let ty = text.trim().trim_start_matches("->");
                info.trailing_return = Some(squash(ty));
            }
            _ => {}
        }
    }
    info
}

enum FunctionName {
    Plain(String),
    Operator(String),
    Destructor,
}

fn function_name<D: ast_grep_core::Doc>(declarator: &Node<D>) -> Option<FunctionName> {
    let name = declarator.field("declarator")?;
    let text = name.text();
    match name.kind().as_ref() {
        "destructor_name" => Some(FunctionName::Destructor),
        "operator_name" => Some(FunctionName::Operator(normalize_operator(&text))),
        "qualified_identifier" => {
            let last = text.rsplit("::").next().unwrap_or_default().trim();
            if last.starts_with('~') {
                Some(FunctionName::Destructor)
            } else {
                Some(FunctionName::Plain(last.to_string()))
            }
        }
        "template_function" => name
            .field("name")
            .map(|n| FunctionName::Plain(n.text().to_string())),
        _ => Some(FunctionName::Plain(text.trim().to_string())),
    }
}

fn is_pure<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    node.children().any(|c| {
        let kind = c.kind();
        kind.as_ref() == "pure_virtual_clause"
            || (kind.as_ref() == "number_literal" && c.text().as_ref() == "0")
    })
}

fn has_virtual_specifier<D: ast_grep_core::Doc>(node: &Node<D>, text: &str) -> bool {
    node.children()
        .any(|c| c.kind().as_ref() == "virtual_specifier" && c.text().as_ref() == text)
}

fn member_markers<D: ast_grep_core::Doc>(node: &Node<D>, state: &ScanState) -> Vec<String> {
    let mut markers: Vec<String> = state.section.iter().cloned().collect();
    markers.extend(state.pending.iter().cloned());
    for inline in inline_prefix_markers(&node.text()) {
        if !markers.contains(&inline) {
            markers.push(inline);
        }
    }
    markers
}

fn member_from_declaration<D: ast_grep_core::Doc>(
    node: &Node<D>,
    state: &ScanState,
    is_template: bool,
) -> Option<MemberNode> {
    let mut return_tokens = Vec::new();
    let Some(declarator) = find_function_declarator(node, &mut return_tokens) else {
        return field_from_declaration(node, state.access);
    };
    let line = line_of(node);
    let is_deleted = child_of_kind(node, "delete_method_clause").is_some();

    if declarator.kind().as_ref() == "operator_cast" {
        return Some(MemberNode::Method(conversion_operator(
            node,
            &declarator,
            state,
            is_template,
        )));
    }

    let info = declarator_info(&declarator);
    match function_name(&declarator)? {
        FunctionName::Destructor => Some(MemberNode::Dtor(DtorNode {
            is_virtual: has_child_text(node, "virtual"),
            is_pure: is_pure(node),
            is_deleted,
            access: state.access,
            line,
        })),
        FunctionName::Plain(name) if name == state.class_name && node.field("type").is_none() => {
            Some(MemberNode::Ctor(CtorNode {
                params: info.params,
                access: state.access,
                is_deleted,
                is_defaulted: child_of_kind(node, "default_method_clause").is_some(),
                is_template,
                is_explicit: node
                    .children()
                    .any(|c| c.kind().as_ref() == "explicit_function_specifier"),
                line,
            }))
        }
        FunctionName::Plain(name) | FunctionName::Operator(name) => {
            let return_type = match &info.trailing_return {
                Some(trailing) => TypeRef::parse(trailing),
                None => {
                    let mut tokens = specifier_tokens(node);
                    tokens.extend(return_tokens);
                    TypeRef::parse(&tokens.join(" "))
                }
            };
            Some(MemberNode::Method(MethodNode {
                name,
                return_type,
                params: info.params,
                qualifiers: info.qualifiers,
                is_virtual: has_child_text(node, "virtual"),
                is_pure: is_pure(node),
                is_override: info.is_override || has_virtual_specifier(node, "override"),
                is_final: info.is_final || has_virtual_specifier(node, "final"),
                is_static: node.children().any(|c| {
                    c.kind().as_ref() == "storage_class_specifier" && c.text().as_ref() == "static"
                }),
                is_template,
                is_deleted,
                is_defaulted: child_of_kind(node, "default_method_clause").is_some(),
                is_noexcept: info.is_noexcept,
                is_conversion: false,
                access: state.access,
                markers: member_markers(node, state),
                line,
            }))
        }
    }
}

/// `operator T() const`: the converted-to type is both name and return type.
fn conversion_operator<D: ast_grep_core::Doc>(
    node: &Node<D>,
    cast: &Node<D>,
    state: &ScanState,
    is_template: bool,
) -> MethodNode {
    let mut type_tokens = specifier_tokens(cast);
    let mut info = DeclaratorInfo::default();
    if let Some(declarator) = cast.field("declarator") {
        let mut current = Some(declarator);
        while let Some(d) = current.take() {
            match d.kind().as_ref() {
                "abstract_function_declarator" | "function_declarator" => {
                    info = declarator_info(&d);
                }
                _ => {
                    let (tokens, _) = declarator_tokens(&d);
                    type_tokens.extend(tokens);
                    current = d.field("declarator");
                }
            }
        }
    }
    let return_type = TypeRef::parse(&type_tokens.join(" "));
    MethodNode {
        name: format!("operator {return_type}"),
        return_type,
        params: info.params,
        qualifiers: info.qualifiers,
        is_virtual: has_child_text(node, "virtual"),
        is_pure: is_pure(node),
        is_override: info.is_override || has_virtual_specifier(node, "override"),
        is_final: info.is_final || has_virtual_specifier(node, "final"),
        is_static: false,
        is_template,
        is_deleted: child_of_kind(node, "delete_method_clause").is_some(),
        is_defaulted: false,
        is_noexcept: info.is_noexcept,
        is_conversion: true,
        access: state.access,
        markers: member_markers(node, state),
        line: line_of(node),
    }
}

// ── Fields, aliases, using ─────────────────────────────────────────

fn field_from_declaration<D: ast_grep_core::Doc>(node: &Node<D>, access: Access) -> Option<MemberNode> {
    if node.kind().as_ref() != "field_declaration" {
        return None;
    }
    let declarator = node.field("declarator")?;
    let name = if declarator.kind().as_ref() == "field_identifier" {
        declarator.text().to_string()
    } else {
        let (_, name) = declarator_tokens(&declarator);
        name.unwrap_or_else(|| find_identifier_recursive(&declarator))
    };
    if name.is_empty() {
        return None;
    }
    Some(MemberNode::Field {
        name,
        access,
        line: line_of(node),
    })
}

fn alias_from_declaration<D: ast_grep_core::Doc>(
    node: &Node<D>,
    access: Access,
    template_params: Vec<TemplateParam>,
) -> Option<AliasNode> {
    let name = node.field("name")?.text().to_string();
    let target = node.field("type")?;
    Some(AliasNode {
        name,
        target: TypeRef::parse(&squash(&target.text())),
        template_params,
        access,
        line: line_of(node),
    })
}

/// `typedef std::vector<T> Vec, *VecPtr;`
fn aliases_from_typedef<D: ast_grep_core::Doc>(node: &Node<D>, access: Access) -> Vec<MemberNode> {
    let base = specifier_tokens(node);
    // The aliased type itself may be a `type_identifier`; it precedes the declarators.
    let skip = usize::from(
        node.field("type")
            .is_some_and(|t| t.kind().as_ref() == "type_identifier"),
    );
    node.children()
        .filter(|c| {
            matches!(
                c.kind().as_ref(),
                "type_identifier" | "pointer_declarator" | "reference_declarator" | "array_declarator"
            )
        })
        .skip(skip)
        .filter_map(|declarator| {
            let (tokens, name) = declarator_tokens(&declarator);
            let mut spelling = base.clone();
            spelling.extend(tokens);
            Some(MemberNode::Alias(AliasNode {
                name: name?,
                target: TypeRef::parse(&spelling.join(" ")),
                template_params: Vec::new(),
                access,
                line: line_of(node),
            }))
        })
        .collect()
}

/// `using Base::Base;` inherits constructors, `using Base::f;` re-exposes
/// base members.
fn member_from_using<D: ast_grep_core::Doc>(node: &Node<D>, access: Access) -> Option<MemberNode> {
    let text = node.text();
    let path = text
        .trim()
        .trim_start_matches("using")
        .trim_end_matches(';')
        .trim()
        .trim_start_matches("typename ")
        .trim();
    let (scope, last) = path.rsplit_once("::")?;
    let scope = squash(scope);
    let last = last.trim().to_string();
    let (scope_name, _) = split_template_args(&scope);
    let scope_simple = scope_name.rsplit("::").next().unwrap_or_default();
    let line = line_of(node);
    if scope_simple == last {
        Some(MemberNode::InheritingCtor {
            base: scope,
            access,
            line,
        })
    } else {
        Some(MemberNode::Using {
            name: normalize_operator(&last),
            access,
            line,
        })
    }
}
