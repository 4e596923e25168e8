//! `watch`: register the standard rules and watch.
//!
//! In the foreground the command blocks until Ctrl+C. With `--background`
//! the watcher is detached and the companion command runs in the
//! foreground instead; the process, and the watcher with it, ends when the
//! companion does.

use super::Companion;
use crate::compile::SassCommand;
use crate::config::{AssetsConfig, Tool};
use crate::core::CompileOptions;
use crate::log;
use crate::resolve::ResolvedPaths;
use crate::utils::exec::Cmd;
use crate::watch::{WatchContext, watch_assets};
use anyhow::{Result, bail};
use std::sync::Arc;

pub fn run(
    config: Arc<AssetsConfig>,
    paths: Arc<ResolvedPaths>,
    debug: bool,
    companion: &Companion,
) -> Result<()> {
    config.check_tools(&[Tool::Scripts, Tool::Styles, Tool::Modules])?;

    let ctx = WatchContext {
        engine: Arc::new(SassCommand::from_config(&config)),
        settings: config.systems.settings.clone(),
        options: CompileOptions::new(debug, false),
        config,
        paths,
    };
    watch_assets(&ctx, companion.background)?;
    run_companion(companion)
}

/// Run the companion of a background watcher; a no-op in the foreground.
pub(super) fn run_companion(companion: &Companion) -> Result<()> {
    if !companion.background {
        return Ok(());
    }
    let Some((program, args)) = companion.command.split_first() else {
        bail!("--background needs a command to run after `--`");
    };

    log!("watch"; "running `{}` alongside the watcher", companion.command.join(" "));
    Cmd::new(program).args(args).attach()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion(background: bool, command: &[&str]) -> Companion {
        Companion {
            background,
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_foreground_has_no_companion() {
        assert!(run_companion(&companion(false, &[])).is_ok());
    }

    #[test]
    fn test_companion_exit_status_propagates() {
        assert!(run_companion(&companion(true, &["true"])).is_ok());
        assert!(run_companion(&companion(true, &["false"])).is_err());
        assert!(run_companion(&companion(true, &[])).is_err());
    }
}
