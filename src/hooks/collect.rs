//! Static collection through the host application.

use super::runner::{HookContext, run_command};
use crate::core::System;
use crate::log;
use crate::utils::exec::SILENT_FILTER;
use anyhow::{Context, Result};

/// Run the collection command for one system.
///
/// Collection is chatty; its output is dropped unless it fails.
pub fn collect_assets(ctx: &HookContext<'_>, system: &System) -> Result<()> {
    let config = ctx.config;
    let vars = ctx.vars(Some(system));

    run_command(
        "collect",
        &config.collect.command,
        config.root(),
        &vars,
        &[],
        &SILENT_FILTER,
    )
    .with_context(|| format!("Failed to collect {system} assets"))?;

    log!("collect"; "finished collecting {system} assets");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_collect_runs_per_system_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(
            dir.path(),
            "[collect]\ncommand = [\"sh\", \"-c\", \"touch collected-$ASSETS_SYSTEM\"]\n",
        );
        let ctx = HookContext::new(&config, "devstack", false);

        collect_assets(&ctx, &config.systems.resolve("studio")).unwrap();
        assert!(dir.path().join("collected-cms").is_file());
    }
}
