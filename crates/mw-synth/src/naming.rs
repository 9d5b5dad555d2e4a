//! Names of the generated mock: class, namespace and controller member.

use mw_core::InterfaceDecl;
use mw_parser::{ParseError, tree::anchored};
use regex::Regex;

/// Placeholder in the mock class template replaced by the first capture
/// group of the class pattern.
pub const CAPTURE_PLACEHOLDER: &str = r"\1";

pub const DEFAULT_CLASS_PATTERN: &str = "(.*)";
pub const DEFAULT_MOCK_CLASS: &str = r"Mock\1";
pub const DEFAULT_CONTROLLER: &str = "control";

/// Resolved names for one mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNames {
    pub mock_name: String,
    pub mock_namespace: String,
    pub controller: String,
}

/// Naming rules shared by every interface of a run.
#[derive(Debug, Clone)]
pub struct MockNaming {
    class_pattern: String,
    regex: Regex,
    mock_class: String,
    namespace: String,
    controller: String,
}

impl MockNaming {
    /// # Errors
    /// `InvalidPattern` if `class_pattern` is not a valid regex.
    pub fn new(
        class_pattern: &str,
        mock_class: impl Into<String>,
        namespace: impl Into<String>,
        controller: impl Into<String>,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            class_pattern: class_pattern.to_string(),
            regex: anchored(class_pattern)?,
            mock_class: mock_class.into(),
            namespace: namespace.into(),
            controller: controller.into(),
        })
    }

    #[must_use]
    pub fn class_pattern(&self) -> &str {
        &self.class_pattern
    }

    /// `Mock\1` with `\1` replaced by the first capture group of the class
    /// pattern. A template without `\1` is used as is; a pattern without a
    /// group captures the whole class name.
    #[must_use]
    pub fn mock_name(&self, class_name: &str) -> String {
        if !self.mock_class.contains(CAPTURE_PLACEHOLDER) {
            return self.mock_class.clone();
        }
        let captured = self
            .regex
            .captures(class_name)
            .and_then(|caps| caps.get(1))
            .map_or(class_name, |m| m.as_str());
        self.mock_class.replace(CAPTURE_PLACEHOLDER, captured)
    }

    /// Empty: the interface's namespace. Leading `::`: absolute.
    /// Otherwise nested in the interface's namespace.
    #[must_use]
    pub fn mock_namespace(&self, interface_namespace: &str) -> String {
        if self.namespace.is_empty() {
            return interface_namespace.to_string();
        }
        if let Some(absolute) = self.namespace.strip_prefix("::") {
            return absolute.to_string();
        }
        if interface_namespace.is_empty() {
            self.namespace.clone()
        } else {
            format!("{interface_namespace}::{}", self.namespace)
        }
    }

    #[must_use]
    pub fn names_for(&self, interface: &InterfaceDecl) -> MockNames {
        MockNames {
            mock_name: self.mock_name(&interface.name),
            mock_namespace: self.mock_namespace(&interface.namespace),
            controller: self.controller.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("(.*)", r"Mock\1", "Foo", "MockFoo")]
    #[case("I(.*)", r"\1Mock", "IFoo", "FooMock")]
    #[case(r"[0-9]([a-z]+)foo", r"foo\1", "4barfooo", "foobar")]
    #[case("(.*)", "FixedName", "Foo", "FixedName")]
    #[case("Foo", r"Mock\1", "Foo", "MockFoo")]
    fn mock_class_names(
        #[case] pattern: &str,
        #[case] template: &str,
        #[case] class: &str,
        #[case] expected: &str,
    ) {
        let naming = MockNaming::new(pattern, template, "", "control").expect("naming");
        assert_eq!(naming.mock_name(class), expected);
    }

    #[rstest]
    #[case("", "", "")]
    #[case("", "outer::inner", "outer::inner")]
    #[case("mocks", "outer", "outer::mocks")]
    #[case("mocks", "", "mocks")]
    #[case("::mocks::deep", "outer", "mocks::deep")]
    fn mock_namespaces(#[case] setting: &str, #[case] interface: &str, #[case] expected: &str) {
        let naming = MockNaming::new("(.*)", r"Mock\1", setting, "control").expect("naming");
        assert_eq!(naming.mock_namespace(interface), expected);
    }

    #[test]
    fn invalid_pattern() {
        let err = MockNaming::new("(", r"Mock\1", "", "control").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPattern { .. }));
    }
}
