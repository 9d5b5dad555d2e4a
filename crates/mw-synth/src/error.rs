//! Translation error types for mw-synth.

use mw_parser::ParseError;

/// Errors that abort the translation of one interface.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// The header could not be turned into a declaration tree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The interface uses something the model cannot represent.
    #[error("unsupported construct in {interface}: `{declaration}`: {reason}")]
    UnsupportedConstruct {
        interface: String,
        declaration: String,
        reason: String,
    },

    /// Two overloads collapse onto the same dispatch key.
    #[error(
        "ambiguous overload in {interface}: `{first}` and `{second}` share dispatch key {key}"
    )]
    AmbiguousOverload {
        interface: String,
        first: String,
        second: String,
        key: String,
    },
}

impl MockError {
    pub(crate) fn unsupported(
        interface: &str,
        declaration: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedConstruct {
            interface: interface.to_string(),
            declaration: declaration.into(),
            reason: reason.into(),
        }
    }
}
