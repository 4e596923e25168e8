//! Theme-aware resolution of style trees, targets and script roots.
//!
//! Runs once at startup. The result is an immutable [`ResolvedPaths`] that
//! the compilers and watch rules receive by reference; nothing mutates the
//! source sets afterwards.
//!
//! ```text
//! base trees ──┬──────────────────────────────────────────► trees
//!              ├─ themes/<name>/static/sass        (if dir exists)
//!              └─ <comprehensive>/<system>/static/sass (each, if exists)
//! ```

use crate::config::AssetsConfig;
use crate::core::{Applicability, OutputTarget, SourceTree, ThemeOverlay};
use crate::debug;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Effective source and output layout for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    /// Base trees followed by existing overlays.
    pub trees: Vec<SourceTree>,
    pub targets: Vec<OutputTarget>,
    /// Fixed load paths from configuration.
    pub base_load_paths: Vec<PathBuf>,
    /// Script discovery roots, including the custom theme root.
    pub script_roots: Vec<PathBuf>,
    /// Overlays that were applied (their directories exist).
    pub overlays: Vec<ThemeOverlay>,
}

impl ResolvedPaths {
    /// Load paths for every style compile call.
    ///
    /// Base load paths, then every tree root, without repeats. The same set
    /// is used for every tree and target so imports resolve identically.
    pub fn load_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> =
            Vec::with_capacity(self.base_load_paths.len() + self.trees.len());
        let candidates = self
            .base_load_paths
            .iter()
            .chain(self.trees.iter().map(|t| &t.root));
        for path in candidates {
            if !paths.contains(path) {
                paths.push(path.clone());
            }
        }
        paths
    }
}

/// Computes [`ResolvedPaths`] from configuration plus theme overlays.
pub struct PathResolver<'a> {
    config: &'a AssetsConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a AssetsConfig) -> Self {
        Self { config }
    }

    /// Candidate overlays in application order, existing or not.
    pub fn candidate_overlays(&self) -> Vec<ThemeOverlay> {
        let theme = &self.config.theme;
        let mut overlays = Vec::new();

        if let Some(theme_root) = self.single_theme_root() {
            overlays.push(ThemeOverlay {
                dir: theme_root.join("static").join("sass"),
                applicability: Applicability::SingleTheme,
            });
        }

        if let Some(dir) = &theme.comprehensive_dir {
            for system in &theme.systems {
                overlays.push(ThemeOverlay {
                    dir: dir.join(system).join("static").join("sass"),
                    applicability: Applicability::Comprehensive {
                        system: system.clone(),
                    },
                });
            }
        }

        overlays
    }

    /// `<parent-of-root>/themes/<name>` when the custom theme is enabled.
    fn single_theme_root(&self) -> Option<PathBuf> {
        let theme = &self.config.theme;
        if !theme.custom || theme.name.is_empty() {
            return None;
        }
        let parent = self.config.root().parent().unwrap_or(self.config.root());
        Some(parent.join("themes").join(&theme.name))
    }

    /// Resolve the effective layout, creating output dirs for live overlays.
    ///
    /// Overlays whose source directory is missing are skipped silently and
    /// get no output directory. Repeated calls give identical results.
    pub fn resolve(&self) -> Result<ResolvedPaths> {
        let styles = &self.config.styles;
        let mut trees = styles.source_trees();
        let mut overlays = Vec::new();

        for overlay in self.candidate_overlays() {
            let Some(tree) = overlay.as_tree(&styles.output_dir) else {
                debug!("resolve"; "theme overlay {} not found, skipping", overlay.dir.display());
                continue;
            };
            create_output_dir(&tree.output)?;
            if !trees.iter().any(|t| t.root == tree.root) {
                trees.push(tree);
            }
            overlays.push(overlay);
        }

        let mut script_roots = self.config.scripts.roots.clone();
        if let Some(theme_root) = self.single_theme_root()
            && !script_roots.contains(&theme_root)
        {
            script_roots.push(theme_root);
        }

        Ok(ResolvedPaths {
            root: self.config.root().to_path_buf(),
            trees,
            targets: styles.output_targets(),
            base_load_paths: styles.load_paths.clone(),
            script_roots,
            overlays,
        })
    }
}

fn create_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
