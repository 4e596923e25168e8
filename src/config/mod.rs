//! Build configuration management for `assets.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One module per TOML section
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # AssetsConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | `[systems]`    | Default systems, name aliases, settings id      |
//! | `[styles]`     | Style trees, targets, load paths, engine        |
//! | `[scripts]`    | Script roots, extension, transpiler             |
//! | `[theme]`      | Single custom theme and comprehensive theme     |
//! | `[modules]`    | Module asset processor and routing files        |
//! | `[preprocess]` | Templated style rendering                       |
//! | `[collect]`    | Static collection                               |
//!
//! Every section is optional; the defaults describe the stock platform
//! checkout, so running without a config file works from its root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CollectConfig, ModulesConfig, PreprocessConfig, ScriptsConfig, StylesConfig, SystemsConfig,
    ThemeConfig, resolve_program,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assets.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Absolute path to the config file (empty when running on defaults)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Repository root - parent of the config file
    #[serde(skip)]
    pub root: PathBuf,

    pub systems: SystemsConfig,
    pub styles: StylesConfig,
    pub scripts: ScriptsConfig,
    pub theme: ThemeConfig,
    pub modules: ModulesConfig,
    pub preprocess: PreprocessConfig,
    pub collect: CollectConfig,
}

/// External programs a subcommand may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Preprocess,
    Modules,
    Scripts,
    Styles,
    Collect,
}

impl AssetsConfig {
    /// Load configuration, searching upward from the current directory.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(config_name, &cwd)
    }

    /// Load configuration, searching upward from `start`.
    ///
    /// Without a config file the defaults apply with `start` as the root.
    pub fn load_from(config_name: &Path, start: &Path) -> Result<Self> {
        let (mut config, root) = match find_config_file(config_name, start) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let path = crate::utils::path::normalize_path(&path);
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                (config, root)
            }
            None => {
                debug!(
                    "config";
                    "no {} found above {}, using defaults",
                    config_name.display(),
                    start.display()
                );
                (Self::default(), crate::utils::path::normalize_path(start))
            }
        };

        // Absolute-path checks only make sense before normalization
        config.validate_paths()?;
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Repository root every relative path is anchored at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Anchor all configured paths at `root`.
    fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.styles.normalize(root);
        self.scripts.normalize(root);
        self.theme.normalize(root);
        self.modules.normalize(root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.styles.validate_paths(&mut diag);
        diag.into_result()?;
        Ok(())
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.systems.validate(&mut diag);
        self.styles.validate(&mut diag);
        self.scripts.validate(&mut diag);
        self.theme.validate(&mut diag);
        self.modules.validate(&mut diag);
        self.preprocess.validate(&mut diag);
        self.collect.validate(&mut diag);

        diag.into_result()?;
        Ok(())
    }

    /// Check that the programs behind `tools` are installed.
    ///
    /// Called per subcommand so `styles` does not demand the transpiler.
    pub fn check_tools(&self, tools: &[Tool]) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        for tool in tools {
            let (field, command) = match tool {
                Tool::Preprocess => (PreprocessConfig::COMMAND, &self.preprocess.command),
                Tool::Modules => (ModulesConfig::COMMAND, &self.modules.command),
                Tool::Scripts => (ScriptsConfig::COMMAND, &self.scripts.command),
                Tool::Styles => (StylesConfig::COMMAND, &self.styles.command),
                Tool::Collect => (CollectConfig::COMMAND, &self.collect.command),
            };
            section::check_installed(field, command, &self.root, &mut diag);
        }

        diag.into_result()?;
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config rooted at `root`, panicking on unknown fields.
#[cfg(test)]
pub fn test_parse_config(root: &Path, content: &str) -> AssetsConfig {
    let (mut parsed, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.finalize(root);
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = AssetsConfig::from_str("[styles\ncommand = [\"sass\"]");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AssetsConfig::default();
        assert_eq!(config.systems.default, vec!["lms", "studio"]);
        assert_eq!(config.systems.settings, "devstack");
        assert_eq!(config.styles.extension, "scss");
        assert_eq!(config.scripts.extension, "coffee");
        assert!(!config.theme.custom);
        assert_eq!(config.modules.touch.len(), 2);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = AssetsConfig::from_str("[styles]\ncommand = [\"npx\", \"sass\"]").unwrap();
        assert_eq!(config.styles.command, vec!["npx", "sass"]);
        assert_eq!(config.styles.output_dir, "css");
        assert_eq!(config.styles.load_paths.len(), 3);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[styles]\nextension = \"scss\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.styles.extension, "scss");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_anchors_paths() {
        let root = Path::new("/platform");
        let config = test_parse_config(root, "[scripts]\nroots = [\"lms\"]");
        assert_eq!(config.scripts.roots, vec![PathBuf::from("/platform/lms")]);
        assert_eq!(
            config.modules.source,
            PathBuf::from("/platform/common/lib/xmodule")
        );
        assert_eq!(
            config.styles.targets[0].source,
            PathBuf::from("/platform/lms/static/sass/lms-main.scss")
        );
    }

    #[test]
    fn test_load_from_finds_file_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cms/static");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("assets.toml"),
            "[systems]\nsettings = \"test\"\n",
        )
        .unwrap();

        let config = AssetsConfig::load_from(Path::new("assets.toml"), &nested).unwrap();
        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.root(), root);
        assert_eq!(config.systems.settings, "test");
        assert_eq!(config.styles.trees[1], root.join("cms/static/sass"));
    }

    #[test]
    fn test_load_from_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AssetsConfig::load_from(Path::new("assets-none.toml"), dir.path()).unwrap();
        assert!(config.config_path.as_os_str().is_empty());
        assert_eq!(config.root(), crate::utils::path::normalize_path(dir.path()));
    }

    #[test]
    fn test_validation_reports_all_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("assets.toml"),
            "[styles]\ncommand = []\nextension = \"\"\n[theme]\ncustom = true\n",
        )
        .unwrap();

        let err = AssetsConfig::load_from(Path::new("assets.toml"), dir.path()).unwrap_err();
        let Some(ConfigError::Invalid(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_absolute_tree_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("assets.toml"),
            "[styles]\ntrees = [\"/etc/sass\"]\n",
        )
        .unwrap();
        assert!(AssetsConfig::load_from(Path::new("assets.toml"), dir.path()).is_err());
    }

    #[test]
    fn test_check_tools_only_requested() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config(
            dir.path(),
            "[styles]\ncommand = [\"sh\"]\n[collect]\ncommand = [\"missing-collector-7f3a\"]\n",
        );
        assert!(config.check_tools(&[Tool::Styles]).is_ok());
        assert!(config.check_tools(&[Tool::Styles, Tool::Collect]).is_err());

        config.collect.command = vec!["sh".into()];
        assert!(config.check_tools(&[Tool::Collect]).is_ok());
    }
}
