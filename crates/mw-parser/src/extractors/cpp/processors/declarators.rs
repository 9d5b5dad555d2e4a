//! Type spellings out of declaration specifiers and declarators.
//!
//! tree-sitter splits `const std::string & name` into a `type_qualifier`,
//! a `type` field and a `reference_declarator` wrapping the identifier.
//! Types are rebuilt here from those pieces, dropping names and default
//! arguments, and handed to [`TypeRef::parse`] for canonicalisation.

use ast_grep_core::Node;
use mw_core::TypeRef;

use super::helpers::squash;

const DECLARATOR_WRAPPERS: [&str; 10] = [
    "pointer_declarator",
    "reference_declarator",
    "abstract_pointer_declarator",
    "abstract_reference_declarator",
    "variadic_declarator",
    "array_declarator",
    "abstract_array_declarator",
    "parenthesized_declarator",
    "abstract_parenthesized_declarator",
    "attributed_declarator",
];

const NAME_KINDS: [&str; 5] = [
    "identifier",
    "field_identifier",
    "type_identifier",
    "operator_name",
    "destructor_name",
];

/// `const`/`volatile` qualifiers of a declaration followed by its `type`
/// field. Qualifier position does not matter to [`TypeRef::parse`].
pub(super) fn specifier_tokens<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<String> {
    let mut tokens: Vec<String> = node
        .children()
        .filter(|c| c.kind().as_ref() == "type_qualifier")
        .map(|c| c.text().to_string())
        .filter(|t| matches!(t.as_str(), "const" | "volatile"))
        .collect();
    if let Some(ty) = node.field("type") {
        tokens.push(squash(&ty.text()));
    }
    tokens
}

/// Tokens a declarator adds to the base type (`*`, `const`, `&`, `...`),
/// outermost first, together with the declared name if any.
pub(super) fn declarator_tokens<D: ast_grep_core::Doc>(node: &Node<D>) -> (Vec<String>, Option<String>) {
    let mut tokens = Vec::new();
    let mut name = None;
    walk_declarator(node, &mut tokens, &mut name);
    (tokens, name)
}

fn walk_declarator<D: ast_grep_core::Doc>(
    node: &Node<D>,
    tokens: &mut Vec<String>,
    name: &mut Option<String>,
) {
    let kind = node.kind();
    let kind = kind.as_ref();
    if NAME_KINDS.contains(&kind) || kind == "qualified_identifier" {
        *name = Some(node.text().to_string());
        return;
    }
    if !DECLARATOR_WRAPPERS.contains(&kind) {
        return;
    }
    let array = kind.ends_with("array_declarator");
    for child in node.children() {
        let child_kind = child.kind();
        match child_kind.as_ref() {
            "*" | "&" | "&&" | "..." => tokens.push(child_kind.to_string()),
            "type_qualifier" => {
                let text = child.text();
                if matches!(text.as_ref(), "const" | "volatile") {
                    tokens.push(text.to_string());
                }
            }
            "[" if array => tokens.push("*".to_string()),
            _ => walk_declarator(&child, tokens, name),
        }
    }
}

/// The type declared by a parameter-like node, without its name or
/// default argument. `None` for the lone `void` of `f(void)`.
pub(super) fn parameter_type<D: ast_grep_core::Doc>(param: &Node<D>) -> Option<TypeRef> {
    if param.kind().as_ref() == "variadic_parameter" {
        return Some(TypeRef::parse("..."));
    }
    let mut tokens = specifier_tokens(param);
    if let Some(declarator) = param.field("declarator") {
        if let Some(function) = function_pointer(&declarator, &mut tokens) {
            tokens.push(function);
            return Some(TypeRef::parse(&tokens.join(" ")));
        }
        let (extra, _) = declarator_tokens(&declarator);
        tokens.extend(extra);
    } else if param.kind().as_ref() == "variadic_parameter_declaration" {
        tokens.push("...".to_string());
    }
    let spelling = tokens.join(" ");
    if spelling.is_empty() {
        return None;
    }
    Some(TypeRef::parse(&spelling))
}

/// `(*)(int, char)` for a pointer or reference to function such as
/// `int (*cb)(int, char x)`. Indirections outside the function
/// declarator belong to the return type and are appended to
/// `return_tokens`.
fn function_pointer<D: ast_grep_core::Doc>(
    node: &Node<D>,
    return_tokens: &mut Vec<String>,
) -> Option<String> {
    let kind = node.kind();
    match kind.as_ref() {
        "function_declarator" | "abstract_function_declarator" => {
            let (inner, _) = node
                .field("declarator")
                .map(|d| declarator_tokens(&d))
                .unwrap_or_default();
            let params: Vec<String> = node
                .field("parameters")
                .map(|list| parameter_types(&list))
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect();
            Some(format!("({})({})", inner.join(" "), params.join(", ")))
        }
        "pointer_declarator"
        | "reference_declarator"
        | "abstract_pointer_declarator"
        | "abstract_reference_declarator" => {
            let mut outer = Vec::new();
            for child in node.children() {
                let child_kind = child.kind();
                match child_kind.as_ref() {
                    "*" | "&" | "&&" => outer.push(child_kind.to_string()),
                    "type_qualifier" => outer.push(child.text().to_string()),
                    _ => {}
                }
            }
            // Reference declarators carry their declarator without a field name.
            let inner = node
                .field("declarator")
                .or_else(|| node.children().find(|c| c.kind().ends_with("_declarator")))?;
            let mark = return_tokens.len();
            return_tokens.extend(outer);
            let function = function_pointer(&inner, return_tokens);
            if function.is_none() {
                return_tokens.truncate(mark);
            }
            function
        }
        _ => None,
    }
}

/// Parameter types of a `parameter_list`, in order.
pub(super) fn parameter_types<D: ast_grep_core::Doc>(list: &Node<D>) -> Vec<TypeRef> {
    let params: Vec<TypeRef> = list
        .children()
        .filter(|c| {
            matches!(
                c.kind().as_ref(),
                "parameter_declaration"
                    | "optional_parameter_declaration"
                    | "variadic_parameter_declaration"
                    | "variadic_parameter"
            )
        })
        .filter_map(|c| parameter_type(&c))
        .collect();
    if params.len() == 1 && params[0].is_void() {
        return Vec::new();
    }
    params
}

/// Locate the function declarator of a member declaration, collecting the
/// pointer/reference tokens of the declarators wrapping it (they belong to
/// the return type).
pub(super) fn find_function_declarator<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    return_tokens: &mut Vec<String>,
) -> Option<Node<'r, D>> {
    for child in node.children() {
        match child.kind().as_ref() {
            "function_declarator" | "operator_cast" => return Some(child),
            "pointer_declarator" | "reference_declarator" | "parenthesized_declarator"
            | "attributed_declarator" => {
                let mut inner_tokens = Vec::new();
                for grandchild in child.children() {
                    let gk = grandchild.kind();
                    match gk.as_ref() {
                        "*" | "&" | "&&" => inner_tokens.push(gk.to_string()),
                        "type_qualifier" => inner_tokens.push(grandchild.text().to_string()),
                        _ => {}
                    }
                }
                let mut nested = Vec::new();
                if let Some(found) = find_function_declarator(&child, &mut nested) {
                    return_tokens.extend(inner_tokens);
                    return_tokens.extend(nested);
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use ast_grep_core::matcher::KindMatcher;
    use ast_grep_language::SupportLang;
    use pretty_assertions::assert_eq;

    fn params_of(source: &str) -> Vec<String> {
        let tree = parse_source(source);
        let root = tree.root();
        let list = root
            .find(KindMatcher::new("parameter_list", SupportLang::Cpp))
            .expect("parameter list");
        parameter_types(&list).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn drops_names_and_defaults() {
        assert_eq!(
            params_of("void f(const std::string& name, int count = 3, float);"),
            vec!["const std::string &", "int", "float"]
        );
    }

    #[test]
    fn keeps_pointers_and_east_const() {
        assert_eq!(
            params_of("void f(int const* p, char * const q, T*& r);"),
            vec!["const int *", "char * const", "T * &"]
        );
    }

    #[test]
    fn void_parameter_list_is_empty() {
        assert!(params_of("void f(void);").is_empty());
        assert!(params_of("void f();").is_empty());
    }

    #[test]
    fn keeps_parameter_packs() {
        assert_eq!(
            params_of("template <typename... Ts> void f(Ts&&... args);"),
            vec!["Ts && ..."]
        );
    }

    #[test]
    fn function_pointers_keep_their_signature() {
        assert_eq!(
            params_of("void f(int (*cb)(int x, const char* name), void (*)(int));"),
            vec!["int(*)(int, const char*)", "void(*)(int)"]
        );
        assert_eq!(
            params_of("void f(char *(*make)(int));"),
            params_of("void f(char * (*)(int));")
        );
        assert_ne!(params_of("void f(int (*cb)(int));"), params_of("void f(int);"));
    }

    #[test]
    fn keeps_template_arguments() {
        assert_eq!(
            params_of("void f(std::shared_ptr<std::vector<unsigned int>> p);"),
            vec!["std::shared_ptr<std::vector<unsigned int>>"]
        );
    }
}
