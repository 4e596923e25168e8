//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Front-end asset build orchestrator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "assets.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Preprocess, compile and collect assets for one or more systems
    #[command(visible_alias = "u")]
    Update {
        #[command(flatten)]
        args: UpdateArgs,
    },

    /// Run one full style pass
    #[command(visible_alias = "s")]
    Styles {
        /// Uncompressed output with source maps
        #[arg(short, long)]
        debug: bool,

        /// Recompile every output
        #[arg(short, long)]
        force: bool,
    },

    /// Compile script sources
    Scripts {
        /// Files to compile (relative to cwd or the project root).
        /// If omitted, compiles every discovered source.
        /// Use `-` to read paths from stdin.
        #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// Watch sources and rebuild on change
    #[command(visible_alias = "w")]
    Watch {
        /// Uncompressed output with source maps
        #[arg(short, long)]
        debug: bool,

        #[command(flatten)]
        companion: Companion,
    },
}

/// Update command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Systems to update (names or aliases). If omitted, uses `systems.default`.
    #[arg(value_name = "SYSTEM")]
    pub systems: Vec<String>,

    /// Environment settings identifier (overrides `systems.settings`)
    #[arg(long)]
    pub settings: Option<String>,

    /// Uncompressed output with source maps
    #[arg(short, long)]
    pub debug: bool,

    /// Skip static collection
    #[arg(long)]
    pub skip_collect: bool,

    /// Keep watching for changes after the update (implied by `--background`)
    #[arg(short, long)]
    pub watch: bool,

    #[command(flatten)]
    pub companion: Companion,
}

/// Background watching next to a foreground command.
///
/// `assetforge watch -b -- ./manage.py lms runserver` keeps rebuilding while
/// the server runs and exits with it.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Companion {
    /// Watch in the background while COMMAND runs in the foreground
    #[arg(short, long, requires = "command")]
    pub background: bool,

    /// Command to run alongside a background watcher (after `--`)
    #[arg(last = true, value_name = "COMMAND", requires = "background")]
    pub command: Vec<String>,
}
