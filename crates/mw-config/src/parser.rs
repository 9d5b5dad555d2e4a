//! `[parser]` section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Location of the C++ parser library.
    #[serde(default)]
    pub library: Option<PathBuf>,

    /// Syntax errors abort the run instead of being logged.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            library: None,
            strict: default_strict(),
        }
    }
}
