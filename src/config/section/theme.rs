//! `[theme]` section configuration.
//!
//! ```toml
//! [theme]
//! custom = true
//! name = "red-theme"                       # ../themes/red-theme
//! comprehensive_dir = "~/edx-themes/acme"  # <dir>/lms/static/sass, ...
//! systems = ["lms", "cms"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Enable the single custom theme next to the repository.
    pub custom: bool,
    /// Directory name under `<parent-of-root>/themes`.
    pub name: String,
    /// Root of a comprehensive theme with one subtree per system.
    pub comprehensive_dir: Option<PathBuf>,
    /// System directories looked up inside `comprehensive_dir`.
    pub systems: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            custom: false,
            name: String::new(),
            comprehensive_dir: None,
            systems: vec!["lms".into(), "cms".into()],
        }
    }
}

impl ThemeConfig {
    pub const NAME: FieldPath = FieldPath::new("theme.name");
    pub const COMPREHENSIVE_DIR: FieldPath = FieldPath::new("theme.comprehensive_dir");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.custom && self.name.trim().is_empty() {
            diag.error_with_hint(
                Self::NAME,
                "custom theme is enabled but no theme name is set",
                "set theme.name or disable theme.custom",
            );
        }
        if self.name.contains(['/', '\\']) {
            diag.error(Self::NAME, "theme name must be a single directory name");
        }
        if self
            .comprehensive_dir
            .as_ref()
            .is_some_and(|d| d.as_os_str().is_empty())
        {
            diag.error(Self::COMPREHENSIVE_DIR, "directory must not be empty");
        }
    }

    /// Expand `~` and anchor a relative comprehensive dir at the root.
    pub fn normalize(&mut self, root: &Path) {
        if let Some(dir) = self.comprehensive_dir.take() {
            if dir.as_os_str().is_empty() {
                self.comprehensive_dir = Some(dir);
                return;
            }
            let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
            let path = PathBuf::from(expanded);
            self.comprehensive_dir = Some(if path.is_relative() {
                root.join(path)
            } else {
                path
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_requires_name() {
        let theme = ThemeConfig {
            custom: true,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        theme.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_normalize_relative_dir() {
        let mut theme = ThemeConfig {
            comprehensive_dir: Some("themes/acme".into()),
            ..Default::default()
        };
        theme.normalize(Path::new("/platform"));
        assert_eq!(
            theme.comprehensive_dir,
            Some(PathBuf::from("/platform/themes/acme"))
        );
    }

    #[test]
    fn test_normalize_absolute_dir() {
        let mut theme = ThemeConfig {
            comprehensive_dir: Some("/srv/themes/acme".into()),
            ..Default::default()
        };
        theme.normalize(Path::new("/platform"));
        assert_eq!(
            theme.comprehensive_dir,
            Some(PathBuf::from("/srv/themes/acme"))
        );
    }
}
