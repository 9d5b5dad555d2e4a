//! Debug dump of the syntax tree.

use std::fmt::Write;

use ast_grep_core::Node;

use crate::parser::AstTree;

/// Render the tree as indented node kinds; leaves also show their text.
#[must_use]
pub fn dump_tree(tree: &AstTree) -> String {
    let mut out = String::new();
    dump_node(&tree.root(), 0, &mut out);
    out
}

fn dump_node<D: ast_grep_core::Doc>(node: &Node<D>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let children: Vec<_> = node.children().collect();
    if children.is_empty() {
        let _ = writeln!(out, "{indent}{} {:?}", node.kind(), node.text());
        return;
    }
    let _ = writeln!(out, "{indent}{} (line {})", node.kind(), node.start_pos().line() + 1);
    for child in &children {
        dump_node(child, depth + 1, out);
    }
}
