//! `[scripts]` section configuration.
//!
//! ```toml
//! [scripts]
//! roots = ["lms", "cms", "common"]
//! extension = "coffee"
//! command = ["node_modules/.bin/coffee", "--compile"]
//! ```

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Directories searched recursively for script sources.
    pub roots: Vec<PathBuf>,
    /// Script source extension, without the dot.
    pub extension: String,
    /// Transpiler command; source files are appended.
    pub command: Vec<String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            roots: vec!["lms".into(), "cms".into(), "common".into()],
            extension: "coffee".into(),
            command: vec!["node_modules/.bin/coffee".into(), "--compile".into()],
        }
    }
}

impl ScriptsConfig {
    pub const EXTENSION: FieldPath = FieldPath::new("scripts.extension");
    pub const COMMAND: FieldPath = FieldPath::new("scripts.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(Self::COMMAND, &self.command, diag);
        if self.extension.trim_start_matches('.').is_empty() {
            diag.error(Self::EXTENSION, "script extension must not be empty");
        }
    }

    pub fn normalize(&mut self, root: &Path) {
        self.extension = self.extension.trim_start_matches('.').to_string();
        for dir in &mut self.roots {
            *dir = root.join(&*dir);
        }
    }
}
