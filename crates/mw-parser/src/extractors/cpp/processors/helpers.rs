//! Shared node helpers for C++ processing.

use ast_grep_core::Node;

/// 1-based source line of a node.
pub(super) fn line_of<D: ast_grep_core::Doc>(node: &Node<D>) -> usize {
    node.start_pos().line() + 1
}

pub(super) fn child_of_kind<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    kind: &str,
) -> Option<Node<'r, D>> {
    node.children().find(|c| c.kind().as_ref() == kind)
}

pub(super) fn has_child_text<D: ast_grep_core::Doc>(node: &Node<D>, text: &str) -> bool {
    node.children().any(|c| c.text().as_ref() == text)
}

/// Collapse runs of whitespace into single spaces.
pub(super) fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First identifier-like name below `node`, descending through declarators.
pub(super) fn find_identifier_recursive<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    for child in node.children() {
        match child.kind().as_ref() {
            "identifier" | "field_identifier" | "type_identifier" => {
                return child.text().to_string();
            }
            "pointer_declarator"
            | "reference_declarator"
            | "init_declarator"
            | "variadic_declarator"
            | "array_declarator"
            | "parenthesized_declarator"
            | "attributed_declarator" => {
                let name = find_identifier_recursive(&child);
                if !name.is_empty() {
                    return name;
                }
            }
            _ => {}
        }
    }
    String::new()
}

/// Split `ns::Base<T, std::pair<A, B>>` into `ns::Base` and its top-level
/// template arguments.
pub(super) fn split_template_args(spelling: &str) -> (String, Vec<String>) {
    let Some(open) = spelling.find('<') else {
        return (spelling.trim().to_string(), Vec::new());
    };
    let name = spelling[..open].trim().to_string();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in spelling[open + 1..].chars() {
        match c {
            '<' | '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            '>' | ')' | ']' if depth > 0 => {
                depth -= 1;
                current.push(c);
            }
            '>' => break,
            ',' if depth == 0 => {
                args.push(squash(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        args.push(squash(&current));
    }
    (name, args)
}

/// Normalise an operator name: `operator ==` → `operator==`,
/// `operator  bool` → `operator bool`.
pub(super) fn normalize_operator(text: &str) -> String {
    let Some(rest) = text.trim().strip_prefix("operator") else {
        return squash(text);
    };
    let rest = squash(rest);
    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        format!("operator {rest}")
    } else {
        format!("operator{}", rest.replace(' ', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_template_arguments() {
        assert_eq!(
            split_template_args("ns::Base<T, std::pair<A, B>, 3>"),
            (
                "ns::Base".to_string(),
                vec!["T".to_string(), "std::pair<A, B>".to_string(), "3".to_string()]
            )
        );
        assert_eq!(split_template_args("Plain"), ("Plain".to_string(), vec![]));
        assert_eq!(split_template_args("Empty<>"), ("Empty".to_string(), vec![]));
    }

    #[test]
    fn normalizes_operator_names() {
        assert_eq!(normalize_operator("operator =="), "operator==");
        assert_eq!(normalize_operator("operator ( )"), "operator()");
        assert_eq!(normalize_operator("operator   bool"), "operator bool");
        assert_eq!(normalize_operator("operator co_await"), "operator co_await");
    }
}
