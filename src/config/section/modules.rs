//! `[modules]` section configuration.
//!
//! ```toml
//! [modules]
//! source = "common/lib/xmodule"
//! output = "common/static/xmodule"
//! extensions = ["css", "js"]
//! command = ["xmodule_assets", "$ASSETS_MODULE_OUTPUT"]
//! touch = ["lms/urls.py", "cms/urls.py"]
//! ```

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Embedded-module source root, watched recursively.
    pub source: PathBuf,
    /// Shared output directory of the module asset processor.
    pub output: PathBuf,
    /// Extensions of module assets that trigger reprocessing.
    pub extensions: Vec<String>,
    /// Module asset processor.
    pub command: Vec<String>,
    /// Routing files touched after reprocessing so the host server reloads.
    pub touch: Vec<PathBuf>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            source: "common/lib/xmodule".into(),
            output: "common/static/xmodule".into(),
            extensions: vec!["css".into(), "js".into()],
            command: vec!["xmodule_assets".into(), "$ASSETS_MODULE_OUTPUT".into()],
            touch: vec!["lms/urls.py".into(), "cms/urls.py".into()],
        }
    }
}

impl ModulesConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("modules.extensions");
    pub const COMMAND: FieldPath = FieldPath::new("modules.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(Self::COMMAND, &self.command, diag);
        if self.extensions.is_empty() {
            diag.error(Self::EXTENSIONS, "at least one asset extension is required");
        }
    }

    pub fn normalize(&mut self, root: &Path) {
        self.source = root.join(&self.source);
        self.output = root.join(&self.output);
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_string();
        }
        for file in &mut self.touch {
            *file = root.join(&*file);
        }
    }
}
