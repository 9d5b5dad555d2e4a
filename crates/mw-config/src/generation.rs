//! `[generation]` section: which classes are mocked and how mocks are named.

use mw_core::Access;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_class_pattern() -> String {
    "(.*)".to_string()
}

fn default_mock_class() -> String {
    r"Mock\1".to_string()
}

fn default_controller() -> String {
    "control".to_string()
}

fn default_access() -> Vec<Access> {
    Access::ALL.to_vec()
}

fn default_slot_markers() -> Vec<String> {
    vec!["slots".to_string(), "Q_SLOT".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Regex matched against the start of each class name.
    #[serde(default = "default_class_pattern")]
    pub class_pattern: String,

    /// Mock class name; `\1` is replaced by the first group of `class_pattern`.
    #[serde(default = "default_mock_class")]
    pub mock_class: String,

    /// Namespace of the mocks. Empty: the interface's own; leading `::`: absolute.
    #[serde(default)]
    pub namespace: String,

    /// Name of the member exposing the mock objects.
    #[serde(default = "default_controller")]
    pub controller: String,

    /// Access levels of the methods to mock. Pure virtual methods are mocked
    /// regardless.
    #[serde(default = "default_access")]
    pub access: Vec<Access>,

    /// Markers that make a non-virtual method a mockable slot.
    #[serde(default = "default_slot_markers")]
    pub slot_markers: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            class_pattern: default_class_pattern(),
            mock_class: default_mock_class(),
            namespace: String::new(),
            controller: default_controller(),
            access: default_access(),
            slot_markers: default_slot_markers(),
        }
    }
}

impl GenerationConfig {
    /// # Errors
    /// `InvalidValue` for an empty pattern or template, a controller that is
    /// not a C++ identifier, or an empty access list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.class_pattern.is_empty() {
            return Err(invalid("generation.class_pattern", "must not be empty"));
        }
        if self.mock_class.is_empty() {
            return Err(invalid("generation.mock_class", "must not be empty"));
        }
        if !is_identifier(&self.controller) {
            return Err(invalid(
                "generation.controller",
                format!("`{}` is not a C++ identifier", self.controller),
            ));
        }
        if self.access.is_empty() {
            return Err(invalid("generation.access", "at least one access level is required"));
        }
        // A leading `::` anchors the path at the global namespace; it still
        // needs at least one component.
        let anchored = self.namespace.strip_prefix("::");
        let namespace = anchored.unwrap_or(&self.namespace);
        let needs_path = anchored.is_some() || !namespace.is_empty();
        if needs_path && !namespace.split("::").all(is_identifier) {
            return Err(invalid(
                "generation.namespace",
                format!("`{}` is not a namespace path", self.namespace),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.access.len(), 3);
        assert_eq!(config.mock_class, r"Mock\1");
    }

    #[test]
    fn rejects_bad_controller() {
        let config = GenerationConfig {
            controller: "my control".to_string(),
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "generation.controller"
        ));
    }

    #[test]
    fn namespaces() {
        for ok in ["", "mocks", "::mocks::inner", "a_b::c1"] {
            let config = GenerationConfig {
                namespace: ok.to_string(),
                ..GenerationConfig::default()
            };
            assert!(config.validate().is_ok(), "{ok}");
        }
        for bad in ["::", "::::", "a::", "::1a", "a b"] {
            let config = GenerationConfig {
                namespace: bad.to_string(),
                ..GenerationConfig::default()
            };
            assert!(config.validate().is_err(), "{bad}");
        }
    }

    #[test]
    fn rejects_empty_access() {
        let config = GenerationConfig {
            access: Vec::new(),
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
