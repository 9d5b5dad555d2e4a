//! End-to-end runs of the `mockwright` binary.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

const HEADER: &str = r"
#pragma once
namespace app {
template <typename T>
class IStore {
public:
    virtual ~IStore() = default;
    virtual T get(int key) const = 0;
    virtual void put(int key, const T& value) = 0;
    virtual void put(int key, T&& value) = 0;
};
}
";

fn mockwright(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mockwright"))
        .current_dir(dir)
        .args(args)
        .env_remove("MOCKWRIGHT_PARSER_LIBRARY")
        .env_remove("MOCKWRIGHT_LOG")
        .output()
        .expect("run mockwright")
}

fn header(dir: &Path, name: &str, source: &str) {
    std::fs::write(dir.join(name), source).expect("write header");
}

#[test]
fn writes_spec_files_that_match_the_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(dir.path(), "store.h", HEADER);

    let run = mockwright(dir.path(), &["store.h", "-o", "out"]);
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));

    let text = std::fs::read_to_string(dir.path().join("out/MockIStore.mockspec.json"))
        .expect("spec written");
    let spec: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(spec["mock_namespace"], "app");
    assert_eq!(spec["mockable_methods"].as_array().map(Vec::len), Some(3));

    let schema_run = mockwright(dir.path(), &["--schema"]);
    assert!(schema_run.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&schema_run.stdout).expect("schema json");
    let validator = jsonschema::validator_for(&schema).expect("valid schema");
    let errors: Vec<String> = validator.iter_errors(&spec).map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "schema errors: {errors:?}");
}

#[test]
fn stdout_prints_a_json_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(dir.path(), "store.h", HEADER);

    let run = mockwright(dir.path(), &["store.h", "--stdout", "--namespace", "::mocks"]);
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
    let specs: serde_json::Value = serde_json::from_slice(&run.stdout).expect("json");
    assert_eq!(specs[0]["mock_namespace"], "mocks");
    assert_eq!(specs[0]["template_params"][0]["name"], "T");
    assert!(std::fs::read_dir(dir.path()).expect("dir").count() == 1);
}

#[test]
fn ambiguous_overloads_exit_nonzero() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(
        dir.path(),
        "bad.h",
        "class Bad { public: virtual void f(int); virtual void f(const int); };",
    );

    let run = mockwright(dir.path(), &["bad.h", "--stdout"]);
    assert_eq!(run.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.contains("ambiguous overload in Bad"), "{stderr}");
    assert!(stderr.contains("mockwright error: 1 of 1 interfaces"), "{stderr}");
}

#[test]
fn missing_header_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let run = mockwright(dir.path(), &["absent.h"]);
    assert_eq!(run.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.starts_with("mockwright error:"), "{stderr}");
    assert!(stderr.contains("absent.h"), "{stderr}");
}

#[test]
fn parser_library_env_is_checked() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(dir.path(), "store.h", HEADER);

    let run = Command::new(env!("CARGO_BIN_EXE_mockwright"))
        .current_dir(dir.path())
        .args(["store.h", "--stdout"])
        .env("MOCKWRIGHT_PARSER_LIBRARY", dir.path().join("missing.so"))
        .output()
        .expect("run mockwright");
    assert_eq!(run.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&run.stderr).contains("parser library not found"));
}

#[test]
fn project_config_is_picked_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(dir.path(), "store.h", HEADER);
    std::fs::create_dir(dir.path().join(".mockwright")).expect("config dir");
    std::fs::write(
        dir.path().join(".mockwright/config.toml"),
        "[generation]\nclass_pattern = \"I(.*)\"\nmock_class = \"Fake\\\\1\"\n",
    )
    .expect("config");

    let run = mockwright(dir.path(), &["store.h", "--stdout"]);
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
    let specs: serde_json::Value = serde_json::from_slice(&run.stdout).expect("json");
    assert_eq!(specs[0]["mock_name"], "FakeStore");
}

#[test]
fn dump_tree_prints_node_kinds() {
    let dir = tempfile::tempdir().expect("tempdir");
    header(dir.path(), "store.h", HEADER);

    let run = mockwright(dir.path(), &["store.h", "--dump-tree"]);
    assert!(run.status.success());
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.starts_with("translation_unit"), "{stdout}");
    assert!(stdout.contains("class_specifier"));
}
