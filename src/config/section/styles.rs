//! `[styles]` section configuration.
//!
//! ```toml
//! [styles]
//! trees = ["cms/static/sass", "common/static/sass"]
//! load_paths = ["common/static", "common/static/sass", "lms/static/sass"]
//! command = ["sass"]
//!
//! [[styles.targets]]
//! source = "lms/static/sass/lms-main.scss"
//! output = "lms/static/css/lms-main.css"
//! ```

use super::{validate_command, validate_relative};
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{OutputTarget, SourceTree};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Directories compiled to their sibling `output_dir`.
    pub trees: Vec<PathBuf>,
    /// Single files with explicit destinations.
    pub targets: Vec<TargetConfig>,
    /// Fixed import search paths, before the tree roots.
    pub load_paths: Vec<PathBuf>,
    /// Style source extension, without the dot.
    pub extension: String,
    /// Globs (relative to the root) never compiled or watched.
    pub exclude: Vec<String>,
    /// Style engine program and leading arguments.
    pub command: Vec<String>,
    /// Name of the output directory next to each tree.
    pub output_dir: String,
}

/// One `[[styles.targets]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl Default for StylesConfig {
    fn default() -> Self {
        let target = |name: &str| TargetConfig {
            source: format!("lms/static/sass/{name}.scss").into(),
            output: format!("lms/static/css/{name}.css").into(),
        };
        Self {
            trees: vec![
                "lms/static/themed_sass".into(),
                "cms/static/sass".into(),
                "common/static/sass".into(),
                "lms/static/certificates/sass".into(),
            ],
            targets: vec![
                target("lms-main"),
                target("lms-main-rtl"),
                target("lms-course"),
                target("lms-course-rtl"),
            ],
            load_paths: vec![
                "common/static".into(),
                "common/static/sass".into(),
                "lms/static/sass".into(),
            ],
            extension: "scss".into(),
            exclude: vec!["common/static/xmodule/**".into()],
            command: vec!["sass".into()],
            output_dir: "css".into(),
        }
    }
}

impl StylesConfig {
    pub const TREES: FieldPath = FieldPath::new("styles.trees");
    pub const TARGETS: FieldPath = FieldPath::new("styles.targets");
    pub const LOAD_PATHS: FieldPath = FieldPath::new("styles.load_paths");
    pub const EXTENSION: FieldPath = FieldPath::new("styles.extension");
    pub const COMMAND: FieldPath = FieldPath::new("styles.command");
    pub const OUTPUT_DIR: FieldPath = FieldPath::new("styles.output_dir");

    /// Base source trees, in configuration order.
    pub fn source_trees(&self) -> Vec<SourceTree> {
        self.trees
            .iter()
            .map(|root| SourceTree::with_sibling_output(root.clone(), &self.output_dir))
            .collect()
    }

    pub fn output_targets(&self) -> Vec<OutputTarget> {
        self.targets
            .iter()
            .map(|t| OutputTarget {
                source: t.source.clone(),
                output: t.output.clone(),
            })
            .collect()
    }

    /// Check paths before they are joined onto the root.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        validate_relative(Self::TREES, &self.trees, diag);
        validate_relative(Self::LOAD_PATHS, &self.load_paths, diag);
        let target_paths: Vec<_> = self
            .targets
            .iter()
            .flat_map(|t| [t.source.clone(), t.output.clone()])
            .collect();
        validate_relative(Self::TARGETS, &target_paths, diag);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(Self::COMMAND, &self.command, diag);
        if self.extension.trim_start_matches('.').is_empty() {
            diag.error(Self::EXTENSION, "style extension must not be empty");
        }
        if self.output_dir.is_empty() || self.output_dir.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::OUTPUT_DIR,
                format!("`{}` is not a directory name", self.output_dir),
                "use a plain name such as \"css\"",
            );
        }
    }

    pub fn normalize(&mut self, root: &Path) {
        self.extension = self.extension.trim_start_matches('.').to_string();
        for tree in &mut self.trees {
            *tree = root.join(&*tree);
        }
        for path in &mut self.load_paths {
            *path = root.join(&*path);
        }
        for target in &mut self.targets {
            target.source = root.join(&target.source);
            target.output = root.join(&target.output);
        }
    }
}
