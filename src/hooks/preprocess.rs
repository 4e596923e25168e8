//! Templated style rendering.
//!
//! Each system's templated sources (`<system>/static/sass/*.scss`) are
//! rendered into a fixed output directory with the system's own settings,
//! before any style compile touches them.

use super::runner::{HookContext, resolve_template, run_command};
use crate::core::System;
use crate::log;
use crate::utils::exec::EMPTY_FILTER;
use crate::utils::fs::collect_files;
use crate::utils::path::{lexical_join, relative_display};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Render the templated style sources of `system`.
///
/// A missing source directory or a failing renderer is an error; a
/// directory without top-level sources is a no-op.
pub fn preprocess_styles(ctx: &HookContext<'_>, system: &System) -> Result<()> {
    let config = ctx.config;
    let root = config.root();
    let mut vars = ctx.vars(Some(system));

    let dir = |template: &str| lexical_join(root, Path::new(&resolve_template(template, &vars)));
    let source_dir = dir(&config.preprocess.source);
    let output_dir = dir(&config.preprocess.output);

    if !source_dir.is_dir() {
        bail!(
            "template source directory for {system} not found: {}",
            source_dir.display()
        );
    }

    let sources = collect_files(&source_dir, &config.styles.extension, false);
    if sources.is_empty() {
        log!(
            "preprocess";
            "no templates in {}, skipping {system}",
            relative_display(&source_dir, root)
        );
        return Ok(());
    }

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    vars.insert("ASSETS_SOURCE_DIR".into(), source_dir.display().to_string());
    vars.insert("ASSETS_OUTPUT_DIR".into(), output_dir.display().to_string());

    run_command(
        "preprocess",
        &config.preprocess.command,
        root,
        &vars,
        &sources,
        &EMPTY_FILTER,
    )
    .with_context(|| format!("Failed to preprocess {system} assets"))?;

    log!("preprocess"; "finished preprocessing {system} assets");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    /// Renderer that copies every source into the output directory.
    const COPY_RENDERER: &str = r#"
[preprocess]
command = ["sh", "-c", "cp \"$ASSETS_SOURCE_DIR\"/*.scss \"$ASSETS_OUTPUT_DIR\"/"]
"#;

    #[test]
    fn test_renders_into_output_dir() {
        let dir = TempDir::new().unwrap();
        let sass = dir.path().join("cms/static/sass");
        fs::create_dir_all(&sass).unwrap();
        fs::write(sass.join("main.scss"), "a { color: red; }").unwrap();

        let config = test_parse_config(dir.path(), COPY_RENDERER);
        let ctx = HookContext::new(&config, "devstack", false);
        let system = config.systems.resolve("studio");

        preprocess_styles(&ctx, &system).unwrap();
        assert!(dir.path().join("cms/static/themed_sass/main.scss").is_file());
    }

    #[test]
    fn test_missing_source_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(dir.path(), COPY_RENDERER);
        let ctx = HookContext::new(&config, "devstack", false);
        let system = config.systems.resolve("lms");

        let err = preprocess_styles(&ctx, &system).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_no_templates_is_noop() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lms/static/sass")).unwrap();
        let config = test_parse_config(
            dir.path(),
            "[preprocess]\ncommand = [\"false\"]\n",
        );
        let ctx = HookContext::new(&config, "devstack", false);

        preprocess_styles(&ctx, &config.systems.resolve("lms")).unwrap();
        assert!(!dir.path().join("lms/static/themed_sass").exists());
    }

    #[test]
    fn test_renderer_failure_is_error() {
        let dir = TempDir::new().unwrap();
        let sass = dir.path().join("lms/static/sass");
        fs::create_dir_all(&sass).unwrap();
        fs::write(sass.join("main.scss"), "").unwrap();
        let config = test_parse_config(
            dir.path(),
            "[preprocess]\ncommand = [\"false\"]\n",
        );
        let ctx = HookContext::new(&config, "devstack", false);

        assert!(preprocess_styles(&ctx, &config.systems.resolve("lms")).is_err());
    }
}
