//! `update`: the full batch pipeline.

use super::UpdateArgs;
use super::watch::run_companion;
use crate::compile::SassCommand;
use crate::config::{AssetsConfig, Tool};
use crate::pipeline::{ExternalSteps, UpdateRequest, run_update};
use crate::resolve::ResolvedPaths;
use anyhow::Result;
use std::sync::Arc;

pub fn run(args: &UpdateArgs, config: Arc<AssetsConfig>, paths: Arc<ResolvedPaths>) -> Result<()> {
    config.check_tools(&required_tools(args))?;

    let settings = args
        .settings
        .clone()
        .unwrap_or_else(|| config.systems.settings.clone());
    let request = UpdateRequest {
        systems: config.systems.resolve_all(&args.systems),
        debug: args.debug,
        skip_collect: args.skip_collect,
        watch: args.watch || args.companion.background,
        background: args.companion.background,
    };

    let engine = Arc::new(SassCommand::from_config(&config));
    let steps = ExternalSteps::new(config, paths, engine, settings, args.debug);
    run_update(&steps, &request)?;
    run_companion(&args.companion)
}

fn required_tools(args: &UpdateArgs) -> Vec<Tool> {
    let mut tools = vec![Tool::Preprocess, Tool::Modules, Tool::Scripts, Tool::Styles];
    if !args.skip_collect {
        tools.push(Tool::Collect);
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Companion;

    fn args(skip_collect: bool) -> UpdateArgs {
        UpdateArgs {
            systems: Vec::new(),
            settings: None,
            debug: false,
            skip_collect,
            watch: false,
            companion: Companion::default(),
        }
    }

    #[test]
    fn test_skip_collect_drops_collect_tool() {
        assert!(required_tools(&args(false)).contains(&Tool::Collect));
        assert!(!required_tools(&args(true)).contains(&Tool::Collect));
    }
}
