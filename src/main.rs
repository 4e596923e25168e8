//! assetforge - front-end asset builds with theme overlays and watch mode.

mod cli;
mod compile;
mod config;
mod core;
mod hooks;
mod logger;
mod pipeline;
mod resolve;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AssetsConfig;
use resolve::PathResolver;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(AssetsConfig::load(&cli.config)?);
    let paths = Arc::new(PathResolver::new(&config).resolve()?);

    match &cli.command {
        Commands::Update { args } => cli::update::run(args, config, paths),
        Commands::Styles { debug, force } => cli::styles::run(&config, &paths, *debug, *force),
        Commands::Scripts { files } => cli::scripts::run(&config, &paths, files),
        Commands::Watch { debug, companion } => {
            cli::watch::run(config, paths, *debug, companion)
        }
    }
}
