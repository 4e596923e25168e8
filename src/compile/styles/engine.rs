//! The style engine seam.
//!
//! The default engine shells out to Dart Sass and reads the compiled CSS
//! from stdout. Tests substitute in-process engines.

use crate::config::{AssetsConfig, resolve_program};
use crate::core::CompileOptions;
use crate::utils::exec::{Cmd, SASS_FILTER};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Output formatting requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Nested, readable output with comments and source annotations.
    Expanded,
    /// Single-line output without comments.
    Compressed,
}

impl From<CompileOptions> for OutputStyle {
    fn from(options: CompileOptions) -> Self {
        if options.debug {
            Self::Expanded
        } else {
            Self::Compressed
        }
    }
}

/// Compiles one stylesheet to CSS text.
///
/// Implementations are shared by parallel workers and concurrent passes.
pub trait StyleEngine: Send + Sync {
    fn compile(&self, source: &Path, load_paths: &[PathBuf], style: OutputStyle)
    -> Result<String>;
}

/// Dart Sass command line.
pub struct SassCommand {
    command: Vec<String>,
    root: PathBuf,
}

impl SassCommand {
    pub fn new(command: Vec<String>, root: PathBuf) -> Self {
        Self { command, root }
    }

    pub fn from_config(config: &AssetsConfig) -> Self {
        Self::new(config.styles.command.clone(), config.root().to_path_buf())
    }

    fn style_args(style: OutputStyle) -> [&'static str; 2] {
        match style {
            OutputStyle::Expanded => ["--style=expanded", "--embed-source-map"],
            OutputStyle::Compressed => ["--style=compressed", "--no-source-map"],
        }
    }
}

impl StyleEngine for SassCommand {
    fn compile(
        &self,
        source: &Path,
        load_paths: &[PathBuf],
        style: OutputStyle,
    ) -> Result<String> {
        let Some((program, args)) = self.command.split_first() else {
            anyhow::bail!("no style command configured");
        };

        Cmd::new(resolve_program(program, &self.root))
            .args(args)
            .args(load_paths.iter().map(|p| format!("--load-path={}", p.display())))
            .args(Self::style_args(style))
            .arg(source)
            .cwd(&self.root)
            .filter(&SASS_FILTER)
            .capture()
            .with_context(|| format!("Failed to compile {}", source.display()))
    }
}
