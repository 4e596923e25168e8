//! `[preprocess]` section configuration.
//!
//! Paths are templates expanded per system before use.
//!
//! ```toml
//! [preprocess]
//! source = "$ASSETS_SYSTEM/static/sass"
//! output = "$ASSETS_SYSTEM/static/themed_sass"
//! command = ["python", "manage.py", "$ASSETS_SYSTEM", "--settings=$ASSETS_SETTINGS",
//!            "preprocess_assets", "$ASSETS_SOURCES", "$ASSETS_OUTPUT_DIR"]
//! ```

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Directory holding the templated style sources.
    pub source: String,
    /// Rendered output directory.
    pub output: String,
    /// Renderer command.
    pub command: Vec<String>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            source: "$ASSETS_SYSTEM/static/sass".into(),
            output: "$ASSETS_SYSTEM/static/themed_sass".into(),
            command: [
                "python",
                "manage.py",
                "$ASSETS_SYSTEM",
                "--settings=$ASSETS_SETTINGS",
                "preprocess_assets",
                "$ASSETS_SOURCES",
                "$ASSETS_OUTPUT_DIR",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl PreprocessConfig {
    pub const SOURCE: FieldPath = FieldPath::new("preprocess.source");
    pub const OUTPUT: FieldPath = FieldPath::new("preprocess.output");
    pub const COMMAND: FieldPath = FieldPath::new("preprocess.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(Self::COMMAND, &self.command, diag);
        if self.source.trim().is_empty() {
            diag.error(Self::SOURCE, "source directory must not be empty");
        }
        if self.output.trim().is_empty() {
            diag.error(Self::OUTPUT, "output directory must not be empty");
        }
    }
}
