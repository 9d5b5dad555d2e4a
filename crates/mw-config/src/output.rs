//! `[output]` section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory receiving `<mock>.mockspec.json` files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Indent the emitted JSON.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pretty: default_pretty(),
        }
    }
}
