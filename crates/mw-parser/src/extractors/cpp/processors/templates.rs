//! Template parameter lists.

use ast_grep_core::Node;
use mw_core::{TemplateParam, TemplateParamKind};

use super::helpers::{find_identifier_recursive, squash};

/// Parameters of a `template_parameter_list`, in declaration order.
pub(crate) fn template_params<D: ast_grep_core::Doc>(list: &Node<D>) -> Vec<TemplateParam> {
    list.children()
        .filter_map(|param| template_param(&param))
        .collect()
}

fn template_param<D: ast_grep_core::Doc>(param: &Node<D>) -> Option<TemplateParam> {
    let kind = match param.kind().as_ref() {
        "type_parameter_declaration"
        | "optional_type_parameter_declaration"
        | "template_template_parameter_declaration" => TemplateParamKind::Type,
        "variadic_type_parameter_declaration" | "variadic_parameter_declaration" => {
            TemplateParamKind::Pack
        }
        "parameter_declaration" | "optional_parameter_declaration" => TemplateParamKind::NonType,
        _ => return None,
    };

    let name = match param.kind().as_ref() {
        "parameter_declaration" | "optional_parameter_declaration" | "variadic_parameter_declaration" => {
            param
                .field("declarator")
                .map(|d| find_declared_name(&d))
                .unwrap_or_default()
        }
        "template_template_parameter_declaration" => param
            .children()
            .filter(|c| {
                matches!(
                    c.kind().as_ref(),
                    "type_parameter_declaration"
                        | "optional_type_parameter_declaration"
                        | "variadic_type_parameter_declaration"
                )
            })
            .last()
            .map(|c| type_param_name(&c))
            .unwrap_or_default(),
        _ => type_param_name(param),
    };

    let text = param.text();
    let declaration = squash(text.split('=').next().unwrap_or_default());
    Some(TemplateParam::new(kind, name).with_declaration(declaration))
}

fn find_declared_name<D: ast_grep_core::Doc>(declarator: &Node<D>) -> String {
    if declarator.kind().as_ref() == "identifier" {
        return declarator.text().to_string();
    }
    find_identifier_recursive(declarator)
}

/// `T` of `typename T`, `class... T` or `typename T = int`.
fn type_param_name<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    node.field("name")
        .or_else(|| node.children().find(|c| c.kind().as_ref() == "type_identifier"))
        .map(|c| c.text().to_string())
        .unwrap_or_default()
}
