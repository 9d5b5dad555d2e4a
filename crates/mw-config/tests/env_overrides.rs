use std::path::PathBuf;

use figment::Jail;
use mw_config::MockwrightConfig;
use pretty_assertions::assert_eq;

#[test]
fn env_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("MOCKWRIGHT_GENERATION__CONTROLLER", "ctl");
        jail.set_env("MOCKWRIGHT_PARSER__STRICT", "false");
        jail.set_env("MOCKWRIGHT_PARSER__LIBRARY", "/usr/lib/libclang.so");

        let config = MockwrightConfig::load(None).expect("config loads");
        assert_eq!(config.generation.controller, "ctl");
        assert!(!config.parser.strict);
        assert_eq!(config.parser.library, Some(PathBuf::from("/usr/lib/libclang.so")));
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join(".mockwright")).expect("create .mockwright");
        jail.create_file(
            ".mockwright/config.toml",
            "[generation]\nnamespace = \"from_file\"\n",
        )?;
        jail.set_env("MOCKWRIGHT_GENERATION__NAMESPACE", "from_env");

        let config = MockwrightConfig::load(None).expect("config loads");
        assert_eq!(config.generation.namespace, "from_env");
        Ok(())
    });
}

#[test]
fn unrelated_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("OTHER_GENERATION__CONTROLLER", "nope");

        let config = MockwrightConfig::load(None).expect("config loads");
        assert_eq!(config.generation.controller, "control");
        Ok(())
    });
}
