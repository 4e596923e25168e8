//! Hook execution utilities.
//!
//! Provides `$ASSETS_*` variable building and command execution for the
//! external programs the pipeline drives.

use crate::config::{AssetsConfig, resolve_program};
use crate::core::System;
use crate::utils::exec::{Cmd, FilterRule};
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Argument replaced by one argument per source file.
pub const SOURCES_ARG: &str = "$ASSETS_SOURCES";

// ============================================================================
// Environment Variables
// ============================================================================

/// Everything needed to run a collaborator for one invocation.
#[derive(Clone, Copy)]
pub struct HookContext<'a> {
    pub config: &'a AssetsConfig,
    /// Environment settings identifier, possibly overridden on the CLI.
    pub settings: &'a str,
    pub debug: bool,
}

impl<'a> HookContext<'a> {
    pub fn new(config: &'a AssetsConfig, settings: &'a str, debug: bool) -> Self {
        Self {
            config,
            settings,
            debug,
        }
    }

    /// Build `$ASSETS_*` variables, plus `ASSETS_SYSTEM` when scoped to one.
    pub fn vars(&self, system: Option<&System>) -> FxHashMap<String, String> {
        let config = self.config;
        let mut vars = FxHashMap::default();

        vars.insert("ASSETS_ROOT".into(), config.root().display().to_string());
        vars.insert("ASSETS_SETTINGS".into(), self.settings.to_string());
        vars.insert("ASSETS_DEBUG".into(), self.debug.to_string());
        vars.insert(
            "ASSETS_MODULE_OUTPUT".into(),
            config.modules.output.display().to_string(),
        );

        if let Some(system) = system {
            vars.insert("ASSETS_SYSTEM".into(), system.dir.clone());
        }

        vars
    }
}

// ============================================================================
// Command Argument Resolution
// ============================================================================

/// Resolve `$ASSETS_*` variables in one template string
///
/// Longer names are replaced first so `$ASSETS_SOURCE_DIR` is never
/// clobbered by a shorter variable sharing its prefix.
pub fn resolve_template(template: &str, vars: &FxHashMap<String, String>) -> String {
    let mut keys: Vec<_> = vars.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut result = template.to_string();
    for key in keys {
        let pattern = format!("${key}");
        if result.contains(&pattern) {
            result = result.replace(&pattern, &vars[key]);
        }
    }
    result
}

/// Resolve `$ASSETS_*` variables in command arguments
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    args.iter().map(|arg| resolve_template(arg, vars)).collect()
}

/// Replace every `$ASSETS_SOURCES` argument with the source file list.
pub fn expand_sources(args: Vec<String>, sources: &[PathBuf]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(args.len() + sources.len());
    for arg in args {
        if arg == SOURCES_ARG {
            expanded.extend(sources.iter().map(|s| s.display().to_string()));
        } else {
            expanded.push(arg);
        }
    }
    expanded
}

// ============================================================================
// Hook Execution
// ============================================================================

/// Run one configured collaborator command from the repository root.
///
/// On an interactive terminal the command runs in a PTY so tools keep
/// their colored diagnostics. Output passing `filter` is logged.
pub fn run_command(
    phase: &str,
    command: &[String],
    root: &Path,
    vars: &FxHashMap<String, String>,
    sources: &[PathBuf],
    filter: &'static FilterRule,
) -> Result<()> {
    let resolved = expand_sources(resolve_args(command, vars), sources);
    let Some((program, args)) = resolved.split_first() else {
        anyhow::bail!("[{phase}] no command configured");
    };

    crate::debug!(phase; "running `{}`", resolved.join(" "));

    Cmd::new(resolve_program(program, root))
        .args(args)
        .cwd(root)
        .envs(vars)
        .terminal(std::io::stdout().is_terminal())
        .filter(filter)
        .run()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::utils::exec::SILENT_FILTER;

    #[test]
    fn test_resolve_args_simple() {
        let mut vars = FxHashMap::default();
        vars.insert("ASSETS_SYSTEM".into(), "cms".into());
        vars.insert("ASSETS_SETTINGS".into(), "devstack".into());

        let args = vec![
            "manage.py".into(),
            "$ASSETS_SYSTEM".into(),
            "--settings=$ASSETS_SETTINGS".into(),
        ];

        let resolved = resolve_args(&args, &vars);
        assert_eq!(resolved, vec!["manage.py", "cms", "--settings=devstack"]);
    }

    #[test]
    fn test_resolve_args_no_vars() {
        let vars = FxHashMap::default();
        let args = vec!["echo".into(), "hello".into()];
        assert_eq!(resolve_args(&args, &vars), args);
    }

    #[test]
    fn test_resolve_template_prefers_longest_key() {
        let mut vars = FxHashMap::default();
        vars.insert("ASSETS_SOURCE".into(), "WRONG".into());
        vars.insert("ASSETS_SOURCE_DIR".into(), "/p/lms/static/sass".into());

        assert_eq!(
            resolve_template("$ASSETS_SOURCE_DIR/*.scss", &vars),
            "/p/lms/static/sass/*.scss"
        );
    }

    #[test]
    fn test_expand_sources() {
        let args = vec!["render".into(), "$ASSETS_SOURCES".into(), "out".into()];
        let sources = vec![PathBuf::from("a.scss"), PathBuf::from("b.scss")];
        assert_eq!(
            expand_sources(args, &sources),
            vec!["render", "a.scss", "b.scss", "out"]
        );
    }

    #[test]
    fn test_expand_sources_empty_list() {
        let args = vec!["render".into(), "$ASSETS_SOURCES".into()];
        assert_eq!(expand_sources(args, &[]), vec!["render"]);
    }

    #[test]
    fn test_context_vars() {
        let config = test_parse_config(Path::new("/platform"), "");
        let ctx = HookContext::new(&config, "production", true);
        let system = config.systems.resolve("studio");

        let vars = ctx.vars(Some(&system));
        assert_eq!(vars["ASSETS_SYSTEM"], "cms");
        assert_eq!(vars["ASSETS_SETTINGS"], "production");
        assert_eq!(vars["ASSETS_DEBUG"], "true");
        assert_eq!(vars["ASSETS_MODULE_OUTPUT"], "/platform/common/static/xmodule");
        assert!(!ctx.vars(None).contains_key("ASSETS_SYSTEM"));
    }

    #[test]
    fn test_run_command_reports_failure() {
        let vars = FxHashMap::default();
        let root = std::env::temp_dir();
        assert!(run_command("test", &["true".into()], &root, &vars, &[], &SILENT_FILTER).is_ok());
        assert!(run_command("test", &["false".into()], &root, &vars, &[], &SILENT_FILTER).is_err());
        assert!(run_command("test", &[], &root, &vars, &[], &SILENT_FILTER).is_err());
    }
}
