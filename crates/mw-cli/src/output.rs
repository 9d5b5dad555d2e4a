use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use mw_core::MockSpec;
use serde::Serialize;

/// Extension of emitted spec files.
pub const SPEC_EXTENSION: &str = "mockspec.json";

/// Render a serializable value as JSON.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

#[must_use]
pub fn spec_file_name(spec: &MockSpec) -> String {
    format!("{}.{SPEC_EXTENSION}", spec.mock_name)
}

/// Write one file per spec into `dir`, creating it if needed.
pub fn write_specs(dir: &Path, specs: &[MockSpec], pretty: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut names = HashSet::new();
    for spec in specs {
        let name = spec_file_name(spec);
        if !names.insert(name.clone()) {
            bail!(
                "two mocks would be written to {name} (last: {}); use --mock-class or --class to tell them apart",
                spec.qualified_mock_name()
            );
        }
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(specs.len());
    for spec in specs {
        let path = dir.join(spec_file_name(spec));
        let mut rendered = render(spec, pretty)?;
        rendered.push('\n');
        std::fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), mock = %spec.qualified_mock_name(), "wrote mock spec");
        written.push(path);
    }
    Ok(written)
}

/// JSON Schema of [`MockSpec`].
pub fn schema() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schemars::schema_for!(MockSpec))?)
}

#[cfg(test)]
mod tests {
    use mw_synth::{Translator, TranslatorSettings};
    use pretty_assertions::assert_eq;

    use super::*;

    fn specs(source: &str) -> Vec<MockSpec> {
        Translator::new(TranslatorSettings::default())
            .expect("translator")
            .translate_source(source, None)
            .expect("run")
            .specs
    }

    #[test]
    fn writes_one_file_per_spec() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("nested").join("out");
        let specs = specs("class A { public: virtual void a(); };\nclass B { public: virtual void b(); };");

        let written = write_specs(&out, &specs, true).expect("write");
        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["MockA.mockspec.json", "MockB.mockspec.json"]);

        let text = std::fs::read_to_string(&written[0]).expect("read");
        let back: MockSpec = serde_json::from_str(&text).expect("valid spec json");
        assert_eq!(back, specs[0]);
    }

    #[test]
    fn refuses_colliding_file_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let specs = specs(
            "namespace a { class I { public: virtual void f(); }; }\nnamespace b { class I { public: virtual void g(); }; }",
        );
        let err = write_specs(dir.path(), &specs, false).unwrap_err();
        assert!(err.to_string().contains("MockI.mockspec.json"));
        assert!(std::fs::read_dir(dir.path()).expect("read dir").next().is_none());
    }

    #[test]
    fn compact_rendering() {
        let rendered = render(&vec![1, 2], false).expect("render");
        assert_eq!(rendered, "[1,2]");
    }

    #[test]
    fn schema_describes_mock_spec() {
        let schema: serde_json::Value = serde_json::from_str(&schema().expect("schema")).expect("json");
        assert_eq!(schema["title"], "MockSpec");
    }
}
