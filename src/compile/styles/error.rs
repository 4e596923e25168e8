use crate::utils::plural::plural_count;
use std::fmt::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Errors of a style pass.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("style source tree not found: {}", .0.display())]
    MissingTree(PathBuf),

    #[error("invalid style exclude pattern")]
    Pattern(#[from] ignore::Error),

    #[error("{}", describe_failures(.failures, .total.to_owned()))]
    Failed {
        failures: Vec<StyleFailure>,
        total: usize,
    },
}

/// One unit that did not compile.
#[derive(Debug)]
pub struct StyleFailure {
    /// Source file, or tree root for a missing tree.
    pub source: PathBuf,
    pub error: anyhow::Error,
}

fn describe_failures(failures: &[StyleFailure], total: usize) -> String {
    let mut out = format!(
        "{} of {} failed",
        failures.len(),
        plural_count(total, "stylesheet")
    );
    for failure in failures {
        let _ = write!(out, "\n  {}: {:#}", failure.source.display(), failure.error);
    }
    out
}
