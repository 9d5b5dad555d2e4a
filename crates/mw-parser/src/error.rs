//! Parser error types for mw-parser.

use std::path::PathBuf;

/// Errors raised while turning a header into a declaration tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error in {path} at {line}:{column}: {snippet}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("no class matching '{pattern}' in {path}")]
    NoMatchingClass { pattern: String, path: String },

    #[error("invalid class pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("parser library not found at {}", path.display())]
    ParserLibrary { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
