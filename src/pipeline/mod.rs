//! Batch update orchestration.
//!
//! Update phases:
//! - **Preprocess** - render templated styles for each system
//! - **Modules** - extract per-module assets
//! - **Scripts** - transpile every script source
//! - **Styles** - one full style pass
//! - **Collect** - gather static assets for each system (skippable)
//! - **Watch** - optional hand-off to the watcher
//!
//! Any failure before the watch phase aborts the run.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::compile::{ScriptCompiler, StyleCompiler, StyleEngine};
use crate::config::AssetsConfig;
use crate::core::{CompileOptions, System};
use crate::hooks::{HookContext, collect_assets, preprocess_styles, process_module_assets};
use crate::resolve::ResolvedPaths;
use crate::watch::{WatchContext, watch_assets};
use crate::{debug, log};

/// The collaborators an update drives, one method per phase.
pub trait PipelineSteps {
    fn preprocess(&self, system: &System) -> Result<()>;
    fn process_modules(&self) -> Result<()>;
    fn compile_scripts(&self) -> Result<()>;
    fn compile_styles(&self, options: CompileOptions) -> Result<()>;
    fn collect(&self, system: &System) -> Result<()>;
    /// Blocks until shutdown unless `background` is set.
    fn watch(&self, options: CompileOptions, background: bool) -> Result<()>;
}

/// One `update` invocation.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub systems: Vec<System>,
    pub debug: bool,
    pub skip_collect: bool,
    pub watch: bool,
    pub background: bool,
}

/// Run the update phases in order.
pub fn run_update(steps: &dyn PipelineSteps, request: &UpdateRequest) -> Result<()> {
    let options = CompileOptions::new(request.debug, false);
    let start = Instant::now();
    let names = request
        .systems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    log!("update"; "updating assets for {} ({})", names, options.mode_name());

    for system in &request.systems {
        steps
            .preprocess(system)
            .with_context(|| format!("Preprocessing failed for {system}"))?;
    }

    steps
        .process_modules()
        .context("Module asset processing failed")?;
    steps.compile_scripts().context("Script compilation failed")?;
    steps
        .compile_styles(options)
        .context("Style compilation failed")?;

    if request.skip_collect {
        debug!("update"; "skipping collection");
    } else {
        for system in &request.systems {
            steps
                .collect(system)
                .with_context(|| format!("Collection failed for {system}"))?;
        }
    }

    log!("update"; "done in {:.2}s", start.elapsed().as_secs_f64());

    if request.watch {
        steps.watch(options, request.background)?;
    }
    Ok(())
}

/// Production steps: external commands plus the in-process compilers.
pub struct ExternalSteps {
    config: Arc<AssetsConfig>,
    paths: Arc<ResolvedPaths>,
    engine: Arc<dyn StyleEngine>,
    settings: String,
    debug: bool,
}

impl ExternalSteps {
    pub fn new(
        config: Arc<AssetsConfig>,
        paths: Arc<ResolvedPaths>,
        engine: Arc<dyn StyleEngine>,
        settings: String,
        debug: bool,
    ) -> Self {
        Self {
            config,
            paths,
            engine,
            settings,
            debug,
        }
    }

    fn hooks(&self) -> HookContext<'_> {
        HookContext::new(&self.config, &self.settings, self.debug)
    }
}

impl PipelineSteps for ExternalSteps {
    fn preprocess(&self, system: &System) -> Result<()> {
        preprocess_styles(&self.hooks(), system)
    }

    fn process_modules(&self) -> Result<()> {
        process_module_assets(&self.hooks())
    }

    fn compile_scripts(&self) -> Result<()> {
        ScriptCompiler::new(&self.config, &self.paths.script_roots).compile_all()?;
        Ok(())
    }

    fn compile_styles(&self, options: CompileOptions) -> Result<()> {
        let styles = &self.config.styles;
        StyleCompiler::new(
            &self.paths,
            self.engine.as_ref(),
            &styles.extension,
            &styles.exclude,
        )?
        .compile(options)?;
        Ok(())
    }

    fn collect(&self, system: &System) -> Result<()> {
        collect_assets(&self.hooks(), system)
    }

    fn watch(&self, options: CompileOptions, background: bool) -> Result<()> {
        let ctx = WatchContext {
            config: Arc::clone(&self.config),
            paths: Arc::clone(&self.paths),
            engine: Arc::clone(&self.engine),
            settings: self.settings.clone(),
            options,
        };
        watch_assets(&ctx, background)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
