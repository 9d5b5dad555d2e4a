//! # mw-config
//!
//! Layered configuration loading for mockwright using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MOCKWRIGHT_*` prefix, `__` as separator)
//! 2. Project-level `.mockwright/config.toml`, or an explicit file
//! 3. User-level `~/.config/mockwright/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Environment Variable Mapping
//!
//! `MOCKWRIGHT_PARSER__STRICT` -> `parser.strict`,
//! `MOCKWRIGHT_GENERATION__CONTROLLER` -> `generation.controller`, etc.

mod error;
mod generation;
mod output;
mod parser;

pub use error::ConfigError;
pub use generation::GenerationConfig;
pub use output::OutputConfig;
pub use parser::ParserConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MOCKWRIGHT_";

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG: &str = ".mockwright/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MockwrightConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl MockwrightConfig {
    /// Load and validate configuration from all sources.
    ///
    /// `explicit` replaces the project-level file when given; unlike the
    /// project file it must exist.
    ///
    /// # Errors
    /// `Figment` for unreadable or mistyped sources, `InvalidValue` when
    /// validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            return Err(ConfigError::InvalidValue {
                field: "config".to_string(),
                reason: format!("{} does not exist", path.display()),
            });
        }
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Explicit or project-local config
        let local_path = explicit.map_or_else(|| PathBuf::from(PROJECT_CONFIG), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    /// `InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mockwright").join("config.toml"))
    }
}
