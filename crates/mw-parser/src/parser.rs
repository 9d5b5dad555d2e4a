//! ast-grep wrapper: header detection, parsing and syntax validation.

use std::path::{Path, PathBuf};

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

use crate::error::ParseError;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

const HEADER_EXTENSIONS: [&str; 8] = ["h", "hh", "hpp", "hxx", "h++", "ipp", "tpp", "inl"];

const SNIPPET_LIMIT: usize = 60;

/// Knobs for one parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Syntax errors abort the parse instead of being logged.
    pub strict: bool,
    /// Explicit parser library location. The C++ grammar is linked into
    /// the binary, so this is only checked for existence.
    pub library: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            library: None,
        }
    }
}

impl ParseOptions {
    /// # Errors
    /// Returns `ParseError::ParserLibrary` if a library path is configured
    /// but does not exist.
    pub fn check_library(&self) -> Result<(), ParseError> {
        let Some(path) = &self.library else {
            return Ok(());
        };
        if !path.exists() {
            return Err(ParseError::ParserLibrary { path: path.clone() });
        }
        tracing::debug!(
            library = %path.display(),
            "parser library configured; using the bundled C++ grammar"
        );
        Ok(())
    }
}

/// Whether `path` looks like a C++ header.
#[must_use]
pub fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Parse C++ source into an ast-grep tree.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Cpp.ast_grep(source)
}

/// Report the first `ERROR` node of the tree.
///
/// In strict mode it becomes a [`ParseError::Syntax`]; otherwise every
/// error node is logged and parsing carries on with the recovered tree.
///
/// # Errors
/// Returns `ParseError::Syntax` in strict mode when the tree has errors.
pub fn check_syntax(tree: &AstTree, path: &str, strict: bool) -> Result<(), ParseError> {
    let root = tree.root();
    let mut errors = Vec::new();
    collect_errors(&root, &mut errors);

    let Some(first) = errors.first() else {
        return Ok(());
    };
    if strict {
        return Err(syntax_error(first, path));
    }
    for node in &errors {
        let ParseError::Syntax {
            line,
            column,
            snippet,
            ..
        } = syntax_error(node, path)
        else {
            continue;
        };
        tracing::warn!(path, line, column, snippet = %snippet, "syntax error; continuing");
    }
    Ok(())
}

fn collect_errors<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>, out: &mut Vec<Node<'r, D>>) {
    if node.kind().as_ref() == "ERROR" {
        out.push(node.clone());
        return;
    }
    for child in node.children() {
        collect_errors(&child, out);
    }
}

fn syntax_error<D: ast_grep_core::Doc>(node: &Node<D>, path: &str) -> ParseError {
    let start = node.start_pos();
    let text = node.text();
    let first_line = text.lines().next().unwrap_or_default().trim();
    let snippet: String = first_line.chars().take(SNIPPET_LIMIT).collect();
    ParseError::Syntax {
        path: path.to_string(),
        line: start.line() + 1,
        column: start.column(node) + 1,
        snippet,
    }
}
