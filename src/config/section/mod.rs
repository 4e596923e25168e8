//! Configuration section definitions.
//!
//! Each module corresponds to a section in `assets.toml`:
//!
//! | Module       | TOML Section   | Purpose                                 |
//! |--------------|----------------|-----------------------------------------|
//! | `systems`    | `[systems]`    | Default systems, aliases, settings      |
//! | `styles`     | `[styles]`     | Style trees, targets, load paths        |
//! | `scripts`    | `[scripts]`    | Script roots and transpiler             |
//! | `theme`      | `[theme]`      | Single and comprehensive theme overlays |
//! | `modules`    | `[modules]`    | Per-module asset processor              |
//! | `preprocess` | `[preprocess]` | Templated style rendering               |
//! | `collect`    | `[collect]`    | Static collection command               |

mod collect;
mod modules;
mod preprocess;
mod scripts;
mod styles;
mod systems;
mod theme;

pub use collect::CollectConfig;
pub use modules::ModulesConfig;
pub use preprocess::PreprocessConfig;
pub use scripts::ScriptsConfig;
pub use styles::StylesConfig;
pub use systems::SystemsConfig;
pub use theme::ThemeConfig;

use crate::config::{ConfigDiagnostics, FieldPath};
use std::path::{Path, PathBuf};

/// Package runners fetch their tool on demand, so `which` on them proves little.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

/// Report an empty command.
pub(crate) fn validate_command(field: FieldPath, command: &[String], diag: &mut ConfigDiagnostics) {
    if command.first().is_none_or(|p| p.trim().is_empty()) {
        diag.error(field, format!("{field} must name a program"));
    }
}

/// Check that the program of `command` can be executed.
///
/// Programs containing a `/` are resolved against `root` (e.g.
/// `node_modules/.bin/coffee`), everything else through `PATH`.
pub(crate) fn check_installed(
    field: FieldPath,
    command: &[String],
    root: &Path,
    diag: &mut ConfigDiagnostics,
) {
    let Some(cmd) = command.first() else {
        return;
    };

    if cmd.contains('/') {
        let program = resolve_program(cmd, root);
        if !program.is_file() {
            diag.error_with_hint(
                field,
                format!("`{}` not found", program.display()),
                "install the project's node dependencies or update the path",
            );
        }
        return;
    }

    if which::which(cmd).is_ok() {
        return;
    }

    if PACKAGE_RUNNERS.contains(&cmd.as_str()) {
        if let Some(package) = command.get(1) {
            diag.note(
                field,
                format!("`{package}` via `{cmd}`, ensure package is installed"),
            );
        }
    } else {
        diag.error_with_hint(
            field,
            format!("`{cmd}` not found"),
            format!("install the command or update {field}"),
        );
    }
}

/// Resolve a configured program path against the repository root.
pub fn resolve_program(program: &str, root: &Path) -> PathBuf {
    let path = Path::new(program);
    if program.contains('/') && path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Report an absolute path in a list that must stay inside the repository.
pub(crate) fn validate_relative(
    field: FieldPath,
    paths: &[PathBuf],
    diag: &mut ConfigDiagnostics,
) {
    for path in paths.iter().filter(|p| p.is_absolute()) {
        diag.error_with_hint(
            field,
            format!("`{}` must be relative to the repository root", path.display()),
            "use [theme] for style sources outside the repository",
        );
    }
}
