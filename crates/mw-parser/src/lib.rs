//! # mw-parser
//!
//! ast-grep-based C++ header parsing for mockwright.
//!
//! Turns one header into a [`TranslationUnit`]: every class definition with
//! its bases, template parameters and members in source order, with
//! parameter and return types canonicalised into [`mw_core::TypeRef`]s.
//!
//! Pipeline: framework macros are hidden ([`preprocess`]), the source is
//! parsed with the tree-sitter C++ grammar bundled by ast-grep, syntax
//! errors are reported ([`parser::check_syntax`]), and the classes are
//! extracted ([`extractors::cpp`]).

pub mod debug;
pub mod error;
pub mod extractors;
pub mod parser;
pub mod preprocess;
pub mod tree;

use std::path::Path;

pub use error::ParseError;
pub use parser::{ParseOptions, is_header};
pub use tree::{
    AliasNode, BaseSpecifier, ClassKind, ClassNode, CtorNode, DtorNode, MemberNode, MethodNode,
    TranslationUnit,
};

/// Read and parse a header.
///
/// # Errors
/// `ParserLibrary` if a configured parser library is missing, `Io` if the
/// file cannot be read, `Syntax` for malformed source in strict mode.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<TranslationUnit, ParseError> {
    options.check_library()?;
    if !is_header(path) {
        tracing::warn!(path = %path.display(), "input does not have a header extension");
    }
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&source, Some(path), options)
}

/// Parse header source held in memory.
///
/// # Errors
/// `Syntax` for malformed source in strict mode.
pub fn parse_str(
    source: &str,
    path: Option<&Path>,
    options: &ParseOptions,
) -> Result<TranslationUnit, ParseError> {
    let shown_path = path.map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());
    let hidden = preprocess::hide_framework_macros(source);
    let tree = parser::parse_source(&hidden);
    parser::check_syntax(&tree, &shown_path, options.strict)?;

    let classes = extractors::cpp::extract(&tree);
    tracing::debug!(path = %shown_path, classes = classes.len(), "parsed header");
    Ok(TranslationUnit::new(path.map(Path::to_path_buf), classes))
}

/// Parse source and dump its syntax tree, for debugging extraction.
#[must_use]
pub fn dump_source(source: &str) -> String {
    let hidden = preprocess::hide_framework_macros(source);
    debug::dump_tree(&parser::parse_source(&hidden))
}
