//! `styles`: one full style pass.

use crate::compile::{SassCommand, StyleCompiler};
use crate::config::{AssetsConfig, Tool};
use crate::core::CompileOptions;
use crate::resolve::ResolvedPaths;
use anyhow::Result;

pub fn run(config: &AssetsConfig, paths: &ResolvedPaths, debug: bool, force: bool) -> Result<()> {
    config.check_tools(&[Tool::Styles])?;

    let engine = SassCommand::from_config(config);
    let styles = &config.styles;
    StyleCompiler::new(paths, &engine, &styles.extension, &styles.exclude)?
        .compile(CompileOptions::new(debug, force))?;
    Ok(())
}
