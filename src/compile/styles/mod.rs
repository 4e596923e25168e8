//! Style compilation.
//!
//! A pass compiles every resolved source tree into its sibling output
//! directory, then every explicit target. All units of a pass share one
//! load-path set (base paths plus every tree root), so an import resolves
//! the same way whichever unit pulls it in.
//!
//! # Failure policy
//!
//! A pass attempts every unit. Successful outputs are written and reported;
//! failures are returned together as [`StyleError::Failed`], so a batch run
//! still fails while a watcher can log the whole list and carry on.
//!
//! # Output
//!
//! Each output is replaced atomically, so concurrent passes (style watcher
//! and module-style watcher) never expose a half-written file.

mod engine;
mod error;
mod minify;

pub use engine::{OutputStyle, SassCommand, StyleEngine};
pub use error::{StyleError, StyleFailure};

use crate::core::CompileOptions;
use crate::resolve::ResolvedPaths;
use crate::utils::fs::{collect_files, write_atomic};
use crate::utils::glob::PathFilter;
use crate::utils::path::relative_display;
use crate::{debug, log};
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One source file and where its CSS goes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Unit {
    source: PathBuf,
    dest: PathBuf,
}

/// A written output and how long it took.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub dest: PathBuf,
    pub duration: Duration,
}

/// Outputs of a successful pass, trees first, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct StyleReport {
    pub compiled: Vec<CompiledUnit>,
}

/// Compiles resolved trees and targets through a [`StyleEngine`].
pub struct StyleCompiler<'a> {
    paths: &'a ResolvedPaths,
    engine: &'a dyn StyleEngine,
    extension: String,
    filter: PathFilter,
}

impl<'a> StyleCompiler<'a> {
    /// `extension` selects tree sources; `exclude` globs are relative to the root.
    pub fn new(
        paths: &'a ResolvedPaths,
        engine: &'a dyn StyleEngine,
        extension: &str,
        exclude: &[String],
    ) -> Result<Self, StyleError> {
        let filter = PathFilter::new(&paths.root, &[extension], exclude)?;
        Ok(Self {
            paths,
            engine,
            extension: extension.trim_start_matches('.').to_string(),
            filter,
        })
    }

    /// Run one full pass.
    pub fn compile(&self, options: CompileOptions) -> Result<StyleReport, StyleError> {
        let load_paths = self.paths.load_paths();
        let style = OutputStyle::from(options);
        let (units, mut failures) = self.units();

        debug!(
            "styles";
            "{} pass over {} units{}",
            options.mode_name(),
            units.len(),
            if options.force { " (forced)" } else { "" }
        );

        let results: Vec<_> = units
            .par_iter()
            .map(|unit| (unit, self.compile_unit(unit, &load_paths, style)))
            .collect();

        let total = results.len() + failures.len();
        let mut report = StyleReport::default();
        for (unit, result) in results {
            match result {
                Ok(duration) => report.compiled.push(CompiledUnit {
                    dest: unit.dest.clone(),
                    duration,
                }),
                Err(error) => failures.push(StyleFailure {
                    source: unit.source.clone(),
                    error,
                }),
            }
        }

        self.report(&report);

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(StyleError::Failed { failures, total })
        }
    }

    /// Tree sources then targets. Missing trees come back as failures.
    fn units(&self) -> (Vec<Unit>, Vec<StyleFailure>) {
        let mut units = Vec::new();
        let mut failures = Vec::new();

        for tree in &self.paths.trees {
            if !tree.root.is_dir() {
                failures.push(StyleFailure {
                    source: tree.root.clone(),
                    error: StyleError::MissingTree(tree.root.clone()).into(),
                });
                continue;
            }

            for source in collect_files(&tree.root, &self.extension, tree.recursive) {
                if is_partial(&source) || self.filter.is_excluded(&source) {
                    continue;
                }
                if let Some(dest) = tree.destination(&source) {
                    units.push(Unit { source, dest });
                }
            }
        }

        units.extend(self.paths.targets.iter().map(|target| Unit {
            source: target.source.clone(),
            dest: target.output.clone(),
        }));

        (units, failures)
    }

    fn compile_unit(
        &self,
        unit: &Unit,
        load_paths: &[PathBuf],
        style: OutputStyle,
    ) -> Result<Duration> {
        let start = Instant::now();

        let css = self.engine.compile(&unit.source, load_paths, style)?;
        let css = match style {
            OutputStyle::Expanded => css,
            OutputStyle::Compressed => minify::minify_css(&css)?,
        };
        write_atomic(&unit.dest, css.as_bytes())?;

        Ok(start.elapsed())
    }

    fn report(&self, report: &StyleReport) {
        for unit in &report.compiled {
            log!(
                "styles";
                ">> {} created in {:.3}s",
                relative_display(&unit.dest, &self.paths.root),
                unit.duration.as_secs_f64()
            );
        }
        log!("styles"; "finished compiling styles");
    }
}

/// `_name.scss` files are import-only.
fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}
