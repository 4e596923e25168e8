use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Merge the roots of every rule into one minimal registration set
/// - Attach existing roots at startup
/// - Re-attach roots that were removed and recreated
pub(super) struct WatchRoots {
    desired: Vec<(PathBuf, RecursiveMode)>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(roots: impl IntoIterator<Item = (PathBuf, RecursiveMode)>) -> Self {
        Self {
            desired: plan(roots),
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn desired(&self) -> &[(PathBuf, RecursiveMode)] {
        &self.desired
    }

    /// Register every existing root. Calling this again is a no-op.
    pub(super) fn attach_existing(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> notify::Result<()> {
        for (path, mode) in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }
            watcher.watch(path, *mode)?;
            self.attached.insert(path.clone());
        }

        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        // Drop stale handles for roots that no longer exist.
        self.attached.retain(|path| path.exists());

        for (path, mode) in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }

            if watcher.watch(path, *mode).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "re-attached watch: {}", path.display());
            }
        }
    }
}

/// Merge roots: one entry per path (recursive wins), and nothing below a
/// recursive root. Order of first appearance is kept.
fn plan(
    roots: impl IntoIterator<Item = (PathBuf, RecursiveMode)>,
) -> Vec<(PathBuf, RecursiveMode)> {
    let mut merged: Vec<(PathBuf, RecursiveMode)> = Vec::new();
    for (path, mode) in roots {
        match merged.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) if mode == RecursiveMode::Recursive => entry.1 = mode,
            Some(_) => {}
            None => merged.push((path, mode)),
        }
    }

    let recursive: Vec<PathBuf> = merged
        .iter()
        .filter(|(_, mode)| *mode == RecursiveMode::Recursive)
        .map(|(path, _)| path.clone())
        .collect();

    merged.retain(|(path, _)| {
        !recursive
            .iter()
            .any(|parent| parent != path && path.starts_with(parent))
    });
    merged
}
