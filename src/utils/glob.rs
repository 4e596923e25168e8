//! Path filters for source discovery and watch rules.
//!
//! A filter accepts files by extension and rejects anything under a set of
//! gitignore-style exclusion patterns anchored at the project root, e.g.
//! `common/static/xmodule/**`.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Extension whitelist plus exclusion globs.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extensions: Vec<String>,
    exclude: Gitignore,
    root: PathBuf,
}

impl PathFilter {
    /// Build a filter over `extensions` (without the dot).
    ///
    /// Exclusion patterns are relative to `root`.
    pub fn new<E: AsRef<str>, X: AsRef<str>>(
        root: &Path,
        extensions: &[E],
        exclude: &[X],
    ) -> Result<Self, ignore::Error> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in exclude {
            builder.add_line(None, pattern.as_ref())?;
        }
        Ok(Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .collect(),
            exclude: builder.build()?,
            root: root.to_path_buf(),
        })
    }

    /// Check whether `path` (a file) passes the filter.
    pub fn matches(&self, path: &Path) -> bool {
        self.has_extension(path) && !self.is_excluded(path)
    }

    /// Check only the extension whitelist.
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }

    /// Check whether `path` or one of its parents is excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        // Paths outside the root cannot be covered by root-anchored patterns
        if !path.starts_with(&self.root) {
            return false;
        }
        self.exclude
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }

    /// Accepted extensions, without dots.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(ext: &[&str], exclude: &[&str]) -> PathFilter {
        PathFilter::new(Path::new("/platform"), ext, exclude).unwrap()
    }

    #[test]
    fn test_extension_whitelist() {
        let f = filter(&["scss"], &[]);
        assert!(f.matches(Path::new("/platform/lms/static/sass/lms.scss")));
        assert!(!f.matches(Path::new("/platform/lms/static/sass/lms.css")));
        assert!(!f.matches(Path::new("/platform/lms/static/sass/scss")));
    }

    #[test]
    fn test_multiple_extensions() {
        let f = filter(&["css", ".js"], &[]);
        assert!(f.matches(Path::new("/platform/common/lib/xmodule/a.css")));
        assert!(f.matches(Path::new("/platform/common/lib/xmodule/b.js")));
        assert!(!f.matches(Path::new("/platform/common/lib/xmodule/c.py")));
    }

    #[test]
    fn test_exclusion_glob() {
        let f = filter(&["scss"], &["common/static/xmodule/**"]);
        assert!(f.is_excluded(Path::new(
            "/platform/common/static/xmodule/modules/scss/video.scss"
        )));
        assert!(!f.matches(Path::new(
            "/platform/common/static/xmodule/modules/scss/video.scss"
        )));
        assert!(f.matches(Path::new("/platform/common/static/sass/bourbon.scss")));
    }

    #[test]
    fn test_exclusion_outside_root() {
        let f = filter(&["scss"], &["common/static/xmodule/**"]);
        assert!(f.matches(Path::new("/themes/red/lms/static/sass/lms.scss")));
    }

    #[test]
    fn test_directory_pattern_excludes_children() {
        let f = filter(&["scss"], &["vendor/"]);
        assert!(f.is_excluded(Path::new("/platform/vendor/lib/x.scss")));
    }
}
