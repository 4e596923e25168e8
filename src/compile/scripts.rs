//! Script transpiling.
//!
//! Batch mode finds every script source under the configured roots and
//! compiles them in one transpiler call. Watch mode hands over just the
//! changed files.

use crate::config::{AssetsConfig, resolve_program};
use crate::log;
use crate::utils::exec::Cmd;
use crate::utils::fs::collect_files;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Transpiles script sources with the configured command.
pub struct ScriptCompiler<'a> {
    config: &'a AssetsConfig,
    roots: &'a [PathBuf],
}

impl<'a> ScriptCompiler<'a> {
    /// `roots` are the resolved script roots (theme root included).
    pub fn new(config: &'a AssetsConfig, roots: &'a [PathBuf]) -> Self {
        Self { config, roots }
    }

    /// Every script source under the roots, root by root, sorted within each.
    pub fn discover(&self) -> Vec<PathBuf> {
        let ext = &self.config.scripts.extension;
        self.roots
            .iter()
            .flat_map(|root| collect_files(root, ext, true))
            .collect()
    }

    /// Directories that directly contain script sources.
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        self.discover()
            .iter()
            .filter_map(|file| file.parent().map(Path::to_path_buf))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Compile every discovered source. Returns how many were compiled.
    ///
    /// Nothing to compile is not an error.
    pub fn compile_all(&self) -> Result<usize> {
        let files = self.discover();
        if files.is_empty() {
            log!("scripts"; "no script sources found");
            return Ok(0);
        }
        self.compile_files(&files)?;
        Ok(files.len())
    }

    /// Compile exactly `files`.
    pub fn compile_files(&self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let root = self.config.root();
        let command = &self.config.scripts.command;
        let Some((program, args)) = command.split_first() else {
            anyhow::bail!("no script command configured");
        };

        Cmd::new(resolve_program(program, root))
            .args(args)
            .args(files)
            .cwd(root)
            .run()
            .with_context(|| format!("Failed to compile {}", plural_count(files.len(), "script")))?;

        log!("scripts"; "compiled {}", plural_count(files.len(), "script"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    /// Fake transpiler: writes `<name>.js` next to every `<name>.coffee`.
    const FAKE_COFFEE: &str = r#"
[scripts]
roots = ["lms", "common"]
command = ["sh", "-c", "for f in \"$@\"; do cp \"$f\" \"${f%.coffee}.js\"; done", "coffee"]
"#;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        for rel in [
            "lms/static/js/a.coffee",
            "lms/static/js/nested/b.coffee",
            "common/static/c.coffee",
            "common/static/skip.js",
        ] {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x = 1").unwrap();
        }
        dir
    }

    #[test]
    fn test_discover_across_roots() {
        let dir = fixture();
        let config = test_parse_config(dir.path(), FAKE_COFFEE);
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);

        let files = compiler.discover();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0], dir.path().join("lms/static/js/a.coffee"));
        assert_eq!(files[2], dir.path().join("common/static/c.coffee"));
    }

    #[test]
    fn test_source_dirs_unique() {
        let dir = fixture();
        let config = test_parse_config(dir.path(), FAKE_COFFEE);
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);

        let dirs = compiler.source_dirs();
        assert_eq!(dirs.len(), 3);
        assert!(dirs.contains(&dir.path().join("lms/static/js/nested")));
    }

    #[test]
    fn test_compile_all() {
        let dir = fixture();
        let config = test_parse_config(dir.path(), FAKE_COFFEE);
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);

        assert_eq!(compiler.compile_all().unwrap(), 3);
        assert!(dir.path().join("lms/static/js/nested/b.js").is_file());
        assert!(dir.path().join("common/static/c.js").is_file());
    }

    #[test]
    fn test_compile_single_file() {
        let dir = fixture();
        let config = test_parse_config(dir.path(), FAKE_COFFEE);
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);

        compiler
            .compile_files(&[dir.path().join("common/static/c.coffee")])
            .unwrap();
        assert!(dir.path().join("common/static/c.js").is_file());
        assert!(!dir.path().join("lms/static/js/a.js").exists());
    }

    #[test]
    fn test_no_sources_is_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(dir.path(), "[scripts]\ncommand = [\"false\"]\n");
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);
        assert_eq!(compiler.compile_all().unwrap(), 0);
    }

    #[test]
    fn test_transpiler_failure_is_error() {
        let dir = fixture();
        let config = test_parse_config(
            dir.path(),
            "[scripts]\nroots = [\"lms\"]\ncommand = [\"false\"]\n",
        );
        let compiler = ScriptCompiler::new(&config, &config.scripts.roots);
        assert!(compiler.compile_all().is_err());
    }
}
