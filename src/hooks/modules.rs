//! Per-module static asset processing.

use super::runner::{HookContext, run_command};
use crate::utils::exec::EMPTY_FILTER;
use crate::utils::fs::touch;
use crate::utils::path::relative_display;
use crate::{debug, log};
use anyhow::{Context, Result};

/// Run the module asset processor once over every module.
pub fn process_module_assets(ctx: &HookContext<'_>) -> Result<()> {
    let config = ctx.config;
    let vars = ctx.vars(None);

    run_command(
        "modules",
        &config.modules.command,
        config.root(),
        &vars,
        &[],
        &EMPTY_FILTER,
    )
    .context("Failed to process module assets")?;

    log!("modules"; "finished processing module assets");
    Ok(())
}

/// Bump the mtime of the routing files so the host server reloads.
///
/// Missing files are skipped. Returns how many files were touched.
pub fn touch_routing_files(ctx: &HookContext<'_>) -> Result<usize> {
    let config = ctx.config;
    let mut touched = 0;

    for file in &config.modules.touch {
        if touch(file)? {
            touched += 1;
        } else {
            debug!(
                "modules";
                "routing file {} not found, skipping",
                relative_display(file, config.root())
            );
        }
    }

    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_processor_receives_output_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(
            dir.path(),
            "[modules]\ncommand = [\"sh\", \"-c\", \"mkdir -p \\\"$ASSETS_MODULE_OUTPUT\\\"\"]\n",
        );
        let ctx = HookContext::new(&config, "devstack", false);

        process_module_assets(&ctx).unwrap();
        assert!(dir.path().join("common/static/xmodule").is_dir());
    }

    #[test]
    fn test_processor_failure_is_error() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(dir.path(), "[modules]\ncommand = [\"false\"]\n");
        let ctx = HookContext::new(&config, "devstack", false);
        assert!(process_module_assets(&ctx).is_err());
    }

    #[test]
    fn test_touch_skips_missing_routing_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lms")).unwrap();
        fs::write(dir.path().join("lms/urls.py"), "").unwrap();

        let config = test_parse_config(dir.path(), "");
        let ctx = HookContext::new(&config, "devstack", false);
        assert_eq!(touch_routing_files(&ctx).unwrap(), 1);
    }
}
