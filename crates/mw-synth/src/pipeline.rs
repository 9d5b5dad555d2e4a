//! One translation run: header → classes → `MockSpec`s.
//!
//! Each requested class goes through Build → Resolve → Assemble on its
//! own. Classes are independent, so they are translated in parallel; the
//! report keeps source order and records every failure.

use std::path::Path;

use mw_core::{Access, MockSpec};
use mw_parser::{ClassNode, ParseOptions, TranslationUnit};
use rayon::prelude::*;

use crate::assemble::assemble;
use crate::builder::ModelBuilder;
use crate::error::MockError;
use crate::naming::{DEFAULT_CLASS_PATTERN, DEFAULT_CONTROLLER, DEFAULT_MOCK_CLASS, MockNaming};
use crate::overload::resolve;
use crate::slots::{MarkerSlotPredicate, SlotPredicate};

/// Everything a [`Translator`] needs besides the header.
#[derive(Debug, Clone)]
pub struct TranslatorSettings {
    pub parse: ParseOptions,
    /// Regex matched against the start of each class name.
    pub class_pattern: String,
    /// Mock class template, `\1` being the first group of `class_pattern`.
    pub mock_class: String,
    pub namespace: String,
    pub controller: String,
    pub access: Vec<Access>,
    pub slot_markers: Vec<String>,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            class_pattern: DEFAULT_CLASS_PATTERN.to_string(),
            mock_class: DEFAULT_MOCK_CLASS.to_string(),
            namespace: String::new(),
            controller: DEFAULT_CONTROLLER.to_string(),
            access: Access::ALL.to_vec(),
            slot_markers: vec!["slots".to_string(), "Q_SLOT".to_string()],
        }
    }
}

/// A class that could not be translated.
#[derive(Debug)]
pub struct Failure {
    pub interface: String,
    pub error: MockError,
}

/// Outcome of translating one header.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Successful translations, in source order.
    pub specs: Vec<MockSpec>,
    /// Failed translations, in source order.
    pub failures: Vec<Failure>,
    /// Matched classes with nothing to mock, left out of a multi-class run.
    pub skipped: Vec<String>,
}

impl RunReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of classes that were translated or attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.specs.len() + self.failures.len()
    }
}

pub struct Translator {
    parse: ParseOptions,
    naming: MockNaming,
    access: Vec<Access>,
    slots: Box<dyn SlotPredicate>,
}

impl Translator {
    /// # Errors
    /// `Parse(InvalidPattern)` if the class pattern does not compile.
    pub fn new(settings: TranslatorSettings) -> Result<Self, MockError> {
        let naming = MockNaming::new(
            &settings.class_pattern,
            settings.mock_class,
            settings.namespace,
            settings.controller,
        )?;
        Ok(Self {
            parse: settings.parse,
            naming,
            access: settings.access,
            slots: Box::new(MarkerSlotPredicate::new(settings.slot_markers)),
        })
    }

    /// Replace the slot convention.
    #[must_use]
    pub fn with_slot_predicate(mut self, slots: impl SlotPredicate + 'static) -> Self {
        self.slots = Box::new(slots);
        self
    }

    /// Parse `path` and translate the classes it defines.
    ///
    /// # Errors
    /// `Parse` if the header cannot be read or parsed, or no class matches.
    pub fn translate_file(&self, path: &Path) -> Result<RunReport, MockError> {
        let unit = mw_parser::parse_file(path, &self.parse)?;
        self.translate_unit(&unit)
    }

    /// # Errors
    /// `Parse` if the source cannot be parsed, or no class matches.
    pub fn translate_source(&self, source: &str, path: Option<&Path>) -> Result<RunReport, MockError> {
        let unit = mw_parser::parse_str(source, path, &self.parse)?;
        self.translate_unit(&unit)
    }

    /// Translate every class of `unit` whose name matches the pattern.
    ///
    /// When several classes match, those with nothing mockable (plain
    /// structs, helpers) are skipped; a single match is always attempted.
    ///
    /// # Errors
    /// `Parse(NoMatchingClass)` if no class matches. Per-class failures are
    /// collected in the report instead.
    pub fn translate_unit(&self, unit: &TranslationUnit) -> Result<RunReport, MockError> {
        let matched = unit.matching(self.naming.class_pattern())?;
        let builder = ModelBuilder::new(unit, self.slots.as_ref(), &self.access);

        let mut report = RunReport::default();
        let requested: Vec<&ClassNode> = if matched.len() == 1 {
            matched
        } else {
            let (candidates, skipped): (Vec<&ClassNode>, Vec<&ClassNode>) =
                matched.into_iter().partition(|c| builder.is_candidate(c));
            for class in skipped {
                tracing::info!(class = %class.qualified_name, "nothing to mock; skipping");
                report.skipped.push(class.qualified_name.clone());
            }
            candidates
        };

        let results: Vec<(String, Result<MockSpec, MockError>)> = requested
            .par_iter()
            .map(|class| (class.qualified_name.clone(), self.translate_class(unit, class)))
            .collect();

        for (interface, result) in results {
            match result {
                Ok(spec) => report.specs.push(spec),
                Err(error) => {
                    tracing::warn!(interface = %interface, error = %error, "translation failed");
                    report.failures.push(Failure { interface, error });
                }
            }
        }
        tracing::info!(
            header = %unit.display_path(),
            translated = report.specs.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "translation finished"
        );
        Ok(report)
    }

    /// Build → Resolve → Assemble for one class.
    ///
    /// # Errors
    /// `UnsupportedConstruct` or `AmbiguousOverload`.
    pub fn translate_class(&self, unit: &TranslationUnit, class: &ClassNode) -> Result<MockSpec, MockError> {
        let builder = ModelBuilder::new(unit, self.slots.as_ref(), &self.access);
        let interface = builder.build(class)?;
        let table = resolve(&interface.qualified_name, &interface.methods)?;
        let names = self.naming.names_for(&interface);
        let spec = assemble(interface, &table, names);
        tracing::debug!(
            interface = %spec.interface.qualified_name,
            mock = %spec.qualified_mock_name(),
            methods = spec.mockable_methods.len(),
            "assembled mock spec"
        );
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::NoSlots;
    use pretty_assertions::assert_eq;

    fn translator() -> Translator {
        Translator::new(TranslatorSettings::default()).expect("translator")
    }

    #[test]
    fn translates_every_candidate_in_source_order() {
        let source = r"
struct Point { int x; int y; };
class A { public: virtual void a(); };
namespace ns { class B { public: virtual void b() = 0; }; }
";
        let report = translator().translate_source(source, None).expect("run");
        let mocks: Vec<String> = report.specs.iter().map(MockSpec::qualified_mock_name).collect();
        assert_eq!(mocks, vec!["MockA", "ns::MockB"]);
        assert_eq!(report.skipped, vec!["Point"]);
        assert!(report.is_success());
    }

    #[test]
    fn failures_do_not_hide_siblings() {
        let source = r"
class Bad { public: virtual void f(int); virtual void f(int); };
class Good { public: virtual void g(); };
class AlsoBad { public: virtual int operator[](int); virtual int operator[](int) const; };
";
        let report = translator().translate_source(source, None).expect("run");
        assert_eq!(report.specs.len(), 1);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.interface.as_str()).collect();
        assert_eq!(failed, vec!["Bad", "AlsoBad"]);
        assert!(matches!(report.failures[0].error, MockError::AmbiguousOverload { .. }));
        assert!(matches!(report.failures[1].error, MockError::UnsupportedConstruct { .. }));
        assert!(!report.is_success());
        assert_eq!(report.attempted(), 3);
    }

    #[test]
    fn single_match_is_always_attempted() {
        let settings = TranslatorSettings {
            class_pattern: "Point".to_string(),
            ..TranslatorSettings::default()
        };
        let translator = Translator::new(settings).expect("translator");
        let report = translator
            .translate_source("struct Point { int x; };", None)
            .expect("run");
        assert_eq!(report.failures.len(), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn no_matching_class() {
        let settings = TranslatorSettings {
            class_pattern: "Missing".to_string(),
            ..TranslatorSettings::default()
        };
        let err = Translator::new(settings)
            .expect("translator")
            .translate_source("class Foo { public: virtual void f(); };", None)
            .unwrap_err();
        assert!(matches!(
            err,
            MockError::Parse(mw_parser::ParseError::NoMatchingClass { .. })
        ));
    }

    #[test]
    fn invalid_pattern_fails_early() {
        let settings = TranslatorSettings {
            class_pattern: "(".to_string(),
            ..TranslatorSettings::default()
        };
        assert!(matches!(
            Translator::new(settings),
            Err(MockError::Parse(mw_parser::ParseError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn slot_predicate_is_swappable() {
        let source = "class W { public slots: void refresh(); };";
        let report = translator().translate_source(source, None).expect("run");
        assert_eq!(report.specs.len(), 1);

        let report = translator()
            .with_slot_predicate(NoSlots)
            .translate_source(source, None)
            .expect("run");
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn syntax_errors_abort_the_run() {
        let err = translator()
            .translate_source("class Foo { public: virtual void f(; } }", None)
            .unwrap_err();
        assert!(matches!(err, MockError::Parse(mw_parser::ParseError::Syntax { .. })));
    }
}
