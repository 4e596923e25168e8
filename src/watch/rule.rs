use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::utils::glob::PathFilter;
use crate::utils::path::normalize_path;
use crate::{debug, log};

/// Rebuild invoked with the changed files that matched a rule.
pub type RebuildAction = Arc<dyn Fn(&[PathBuf]) -> anyhow::Result<()> + Send + Sync>;

/// One watcher: where to look, which files count, what to run.
pub struct WatchRule {
    pub name: &'static str,
    pub roots: Vec<PathBuf>,
    /// Whether changes below the roots' direct children count.
    pub recursive: bool,
    pub filter: PathFilter,
    pub action: RebuildAction,
}

impl WatchRule {
    pub fn new(
        name: &'static str,
        roots: impl IntoIterator<Item = PathBuf>,
        recursive: bool,
        filter: PathFilter,
        action: RebuildAction,
    ) -> Self {
        let mut normalized: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = normalize_path(&root);
            if !normalized.contains(&root) {
                normalized.push(root);
            }
        }
        Self {
            name,
            roots: normalized,
            recursive,
            filter,
            action,
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        let under_root = if self.recursive {
            self.roots.iter().any(|root| path.starts_with(root))
        } else {
            path.parent()
                .is_some_and(|parent| self.roots.iter().any(|root| root == parent))
        };
        under_root && self.filter.matches(path)
    }

    /// Run the rebuild for a batch of changes.
    ///
    /// Errors and panics are logged and swallowed so the rule keeps serving
    /// later events. Returns whether the rebuild succeeded.
    pub fn handle(&self, changed: &[PathBuf]) -> bool {
        for path in changed {
            log!("watch"; "[{}] changed: {}", self.name, path.display());
        }

        match catch_unwind(AssertUnwindSafe(|| (self.action)(changed))) {
            Ok(Ok(())) => {
                debug!("watch"; "[{}] rebuild done", self.name);
                true
            }
            Ok(Err(e)) => {
                log!("error"; "[{}] rebuild failed: {:?}", self.name, e);
                false
            }
            Err(payload) => {
                log!("error"; "[{}] rebuild panicked: {}", self.name, panic_message(&*payload));
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
