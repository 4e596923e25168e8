//! The four standard watch rules.
//!
//! | rule           | roots                    | files               | rebuild                  |
//! |----------------|--------------------------|---------------------|--------------------------|
//! | scripts        | script source dirs, flat | script extension    | changed scripts only     |
//! | styles         | load paths, recursive    | style ext, excludes | full style pass          |
//! | module-styles  | modules source           | style extension     | full style pass          |
//! | module-assets  | modules source           | module extensions   | process + touch routing  |

use std::path::PathBuf;
use std::sync::Arc;

use super::rule::{RebuildAction, WatchRule};
use crate::compile::{ScriptCompiler, StyleCompiler, StyleEngine};
use crate::config::AssetsConfig;
use crate::core::CompileOptions;
use crate::hooks::{HookContext, process_module_assets, touch_routing_files};
use crate::resolve::ResolvedPaths;
use crate::utils::glob::PathFilter;

/// Everything the rebuild actions need, shared across rule threads.
#[derive(Clone)]
pub struct WatchContext {
    pub config: Arc<AssetsConfig>,
    pub paths: Arc<ResolvedPaths>,
    pub engine: Arc<dyn StyleEngine>,
    /// Environment settings identifier passed to the module processor.
    pub settings: String,
    pub options: CompileOptions,
}

pub fn standard_rules(ctx: &WatchContext) -> Result<Vec<WatchRule>, ignore::Error> {
    Ok(vec![
        scripts_rule(ctx)?,
        styles_rule(ctx)?,
        module_styles_rule(ctx)?,
        module_assets_rule(ctx)?,
    ])
}

fn scripts_rule(ctx: &WatchContext) -> Result<WatchRule, ignore::Error> {
    let config = &ctx.config;
    let roots = ScriptCompiler::new(config, &ctx.paths.script_roots).source_dirs();
    let filter = PathFilter::new(config.root(), &[&config.scripts.extension], &[] as &[&str])?;

    let action_ctx = ctx.clone();
    let action: RebuildAction = Arc::new(move |changed: &[PathBuf]| {
        ScriptCompiler::new(&action_ctx.config, &action_ctx.paths.script_roots)
            .compile_files(changed)
    });

    Ok(WatchRule::new("scripts", roots, false, filter, action))
}

fn styles_rule(ctx: &WatchContext) -> Result<WatchRule, ignore::Error> {
    let styles = &ctx.config.styles;
    let filter = PathFilter::new(
        ctx.config.root(),
        &[&styles.extension],
        styles.exclude.as_slice(),
    )?;
    Ok(WatchRule::new(
        "styles",
        ctx.paths.load_paths(),
        true,
        filter,
        style_pass(ctx),
    ))
}

fn module_styles_rule(ctx: &WatchContext) -> Result<WatchRule, ignore::Error> {
    let config = &ctx.config;
    let filter = PathFilter::new(config.root(), &[&config.styles.extension], &[] as &[&str])?;
    Ok(WatchRule::new(
        "module-styles",
        [config.modules.source.clone()],
        true,
        filter,
        style_pass(ctx),
    ))
}

fn module_assets_rule(ctx: &WatchContext) -> Result<WatchRule, ignore::Error> {
    let config = &ctx.config;
    let filter = PathFilter::new(
        config.root(),
        config.modules.extensions.as_slice(),
        &[] as &[&str],
    )?;

    let action_ctx = ctx.clone();
    let action: RebuildAction = Arc::new(move |_changed: &[PathBuf]| -> anyhow::Result<()> {
        let config = &action_ctx.config;
        let hooks = HookContext::new(config, &action_ctx.settings, action_ctx.options.debug);
        process_module_assets(&hooks)?;
        // Routing files are only touched once processing succeeded
        touch_routing_files(&hooks)?;
        Ok(())
    });

    Ok(WatchRule::new(
        "module-assets",
        [config.modules.source.clone()],
        true,
        filter,
        action,
    ))
}

/// Full style pass; changed paths are irrelevant since imports fan out.
fn style_pass(ctx: &WatchContext) -> RebuildAction {
    let ctx = ctx.clone();
    Arc::new(move |_changed: &[PathBuf]| -> anyhow::Result<()> {
        let styles = &ctx.config.styles;
        StyleCompiler::new(
            &ctx.paths,
            ctx.engine.as_ref(),
            &styles.extension,
            &styles.exclude,
        )?
        .compile(ctx.options)?;
        Ok(())
    })
}
