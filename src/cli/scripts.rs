//! `scripts`: batch or explicit-file script compile.

use crate::compile::ScriptCompiler;
use crate::config::{AssetsConfig, Tool};
use crate::resolve::ResolvedPaths;
use crate::utils::path::resolve_path;
use anyhow::{Result, bail};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

pub fn run(config: &AssetsConfig, paths: &ResolvedPaths, files: &[PathBuf]) -> Result<()> {
    config.check_tools(&[Tool::Scripts])?;

    let compiler = ScriptCompiler::new(config, &paths.script_roots);
    if files.is_empty() {
        compiler.compile_all()?;
        return Ok(());
    }

    let files = if files.len() == 1 && files[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        files.to_vec()
    };
    compiler.compile_files(&resolve_files(&files, config.root())?)
}

/// Resolve every path against cwd or the root; each must be an existing file.
fn resolve_files(files: &[PathBuf], root: &Path) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(files.len());
    for file in files {
        let path = resolve_path(file, root);
        if !path.is_file() {
            bail!(
                "Script not found: {}\n  Tried:\n    - {}\n    - {}",
                file.display(),
                file.display(),
                root.join(file).display()
            );
        }
        resolved.push(path);
    }
    Ok(resolved)
}

/// Read file paths from stdin, one per line
fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}
