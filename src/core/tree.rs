//! Style source units: whole trees, single-file targets, theme overlays.

use std::path::{Path, PathBuf};

/// A directory of style sources compiled in bulk to a sibling directory.
///
/// `lms/static/sass` compiles into `lms/static/css`.
///
/// The source pattern and exclusions are the same for every tree of a
/// pass (`styles.extension`, `styles.exclude`), so they live on
/// `StyleCompiler` rather than being copied into each tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    pub root: PathBuf,
    pub output: PathBuf,
    pub recursive: bool,
}

impl SourceTree {
    /// Tree whose output is the sibling `output_dir` of `root`.
    pub fn with_sibling_output(root: PathBuf, output_dir: &str) -> Self {
        let output = root
            .parent()
            .map_or_else(|| PathBuf::from(output_dir), |p| p.join(output_dir));
        Self {
            root,
            output,
            recursive: true,
        }
    }

    /// Destination of `source` (a file under `root`) with extension `css`.
    pub fn destination(&self, source: &Path) -> Option<PathBuf> {
        let rel = source.strip_prefix(&self.root).ok()?;
        Some(self.output.join(rel).with_extension("css"))
    }
}

/// A single source file compiled to an explicit destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Who a theme overlay applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    /// `<parent-of-root>/themes/<name>`, shared by every system.
    SingleTheme,
    /// `<theme-dir>/<system>`, one overlay per system.
    Comprehensive { system: String },
}

/// A theme-provided style directory layered over the base trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeOverlay {
    /// The overlay's `static/sass` directory.
    pub dir: PathBuf,
    pub applicability: Applicability,
}

impl ThemeOverlay {
    /// Convert to a source tree if the overlay directory exists.
    pub fn as_tree(&self, output_dir: &str) -> Option<SourceTree> {
        self.dir
            .is_dir()
            .then(|| SourceTree::with_sibling_output(self.dir.clone(), output_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_output() {
        let tree = SourceTree::with_sibling_output(PathBuf::from("/p/cms/static/sass"), "css");
        assert_eq!(tree.output, PathBuf::from("/p/cms/static/css"));
        assert!(tree.recursive);
    }

    #[test]
    fn test_destination_keeps_relative_layout() {
        let tree = SourceTree::with_sibling_output(PathBuf::from("/p/cms/static/sass"), "css");
        assert_eq!(
            tree.destination(Path::new("/p/cms/static/sass/views/login.scss")),
            Some(PathBuf::from("/p/cms/static/css/views/login.css"))
        );
        assert_eq!(tree.destination(Path::new("/elsewhere/a.scss")), None);
    }

    #[test]
    fn test_overlay_missing_dir() {
        let overlay = ThemeOverlay {
            dir: PathBuf::from("/nonexistent/themes/red/static/sass"),
            applicability: Applicability::SingleTheme,
        };
        assert!(overlay.as_tree("css").is_none());
    }
}
