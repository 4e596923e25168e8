//! External command execution.
//!
//! Every collaborator (style engine, script transpiler, template renderer,
//! module asset processor, static collection) is an external program driven
//! through [`Cmd`]. A captured command finishes one of two ways:
//!
//! - [`Cmd::capture`] hands back stdout as text. The style engine writes the
//!   compiled stylesheet there.
//! - [`Cmd::run`] only cares about success and logs whatever the tool printed.
//!   With [`Cmd::terminal`] set the tool runs inside a PTY so its colored
//!   diagnostics survive.
//!
//! [`Cmd::attach`] is the odd one out: the tool shares this process's stdio
//! and nothing is captured.
//!
//! ```ignore
//! let css = Cmd::new("sass")
//!     .args(["--style=compressed", "lms/static/sass/lms-main.scss"])
//!     .cwd(root)
//!     .filter(&SASS_FILTER)
//!     .capture()?;
//! ```

use crate::log;
use anyhow::{Context, Result, anyhow};
use portable_pty::{CommandBuilder, NativePtySystem, PtySize, PtySystem};
use regex::Regex;
use std::ffi::{OsStr, OsString};
use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

/// One invocation of an external tool.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    terminal: bool,
    filter: &'static FilterRule,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            terminal: false,
            filter: &EMPTY_FILTER,
        }
    }

    /// Append one argument. An empty argument (an unset variable in a
    /// configured command) is dropped.
    pub fn arg<S: AsRef<OsStr>>(self, arg: S) -> Self {
        self.args([arg])
    }

    /// Append arguments, dropping empty ones.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|arg| arg.as_ref().to_owned())
                .filter(|arg| !arg.is_empty()),
        );
        self
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.envs.extend(
            vars.into_iter()
                .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned())),
        );
        self
    }

    /// Run inside a PTY when `enable` is set. Only affects [`Cmd::run`];
    /// stdout and stderr arrive merged.
    pub fn terminal(mut self, enable: bool) -> Self {
        self.terminal = enable;
        self
    }

    /// Lines starting with one of the filter's prefixes are not logged.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = filter;
        self
    }

    fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run and return stdout. Stderr is logged through the filter.
    pub fn capture(self) -> Result<String> {
        let (name, filter) = (self.name(), self.filter);
        let output = self.output()?;
        check_success(&name, &output, filter)?;

        filter.log(&name, &String::from_utf8_lossy(&output.stderr));
        String::from_utf8(output.stdout)
            .with_context(|| format!("`{name}` printed non-UTF-8 output"))
    }

    /// Run for its side effects, logging what the tool printed.
    pub fn run(self) -> Result<()> {
        if self.terminal {
            return self.run_in_pty();
        }

        let (name, filter) = (self.name(), self.filter);
        let output = self.output()?;
        check_success(&name, &output, filter)?;

        filter.log(&name, &String::from_utf8_lossy(&output.stdout));
        filter.log(&name, &String::from_utf8_lossy(&output.stderr));
        Ok(())
    }

    /// Run with the tool attached to this process's stdin, stdout and stderr.
    ///
    /// For long-running companions (a dev server next to a background
    /// watcher) whose output must stream rather than arrive at exit.
    pub fn attach(self) -> Result<()> {
        let name = self.name();
        let status = self
            .command()
            .status()
            .with_context(|| format!("Failed to execute `{name}`"))?;
        if !status.success() {
            return Err(failure(&name, status, "", ""));
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.envs.iter().cloned());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn output(&self) -> Result<Output> {
        self.command()
            .output()
            .with_context(|| format!("Failed to execute `{}`", self.name()))
    }

    fn run_in_pty(self) -> Result<()> {
        let name = self.name();

        let mut builder = CommandBuilder::new(&self.program);
        builder.args(&self.args);
        for (k, v) in &self.envs {
            builder.env(k, v);
        }
        if let Some(dir) = &self.cwd {
            builder.cwd(dir);
        }

        let pair = NativePtySystem::default().openpty(PtySize {
            rows: 24,
            cols: 120,
            pixel_width: 0,
            pixel_height: 0,
        })?;
        let mut child = pair
            .slave
            .spawn_command(builder)
            .with_context(|| format!("Failed to execute `{name}`"))?;
        drop(pair.slave);

        // Reads block until the child closes its side
        let mut reader = pair.master.try_clone_reader()?;
        let collector = std::thread::spawn(move || {
            let mut printed = String::new();
            let _ = reader.read_to_string(&mut printed);
            printed
        });

        let status = child.wait()?;
        drop(pair.master);
        let printed = collector
            .join()
            .map_err(|_| anyhow!("output reader for `{name}` panicked"))?;

        if !status.success() {
            let code = format!("exit code {}", status.exit_code());
            return Err(failure(&name, code, &printed, ""));
        }
        self.filter.log(&name, &printed);
        Ok(())
    }
}

/// Lines a tool prints that are never worth showing.
pub struct FilterRule {
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn keeps(&self, line: &str) -> bool {
        !line.is_empty() && !self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Known noise; unlike [`FilterRule::keeps`], the catch-all empty prefix
    /// does not count, so a failing silent tool still explains itself.
    fn is_chatter(&self, line: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|p| !p.is_empty() && line.starts_with(p))
    }

    /// Log the surviving lines of `printed` as one block under `name`.
    pub fn log(&self, name: &str, printed: &str) {
        let kept: Vec<_> = printed
            .lines()
            .filter(|line| self.keeps(strip_ansi(line).trim()))
            .collect();
        if !kept.is_empty() {
            log!(name; "{}", kept.join("\n"));
        }
    }
}

pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Skips everything; the empty prefix matches any line.
pub const SILENT_FILTER: FilterRule = FilterRule::new(&[""]);

/// Dart Sass prints deprecation chatter on stderr for every file.
pub const SASS_FILTER: FilterRule =
    FilterRule::new(&["Deprecation Warning", "DEPRECATION WARNING", "More info"]);

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

fn check_success(name: &str, output: &Output, filter: &FilterRule) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let diagnostics: Vec<_> = stderr
        .lines()
        .filter(|line| !filter.is_chatter(strip_ansi(line).trim()))
        .collect();
    Err(failure(name, &output.status, &diagnostics.join("\n"), &stdout))
}

/// `` `sass` exited with exit status: 65 `` followed by what the tool said.
fn failure(name: &str, status: impl Display, diagnostics: &str, stdout: &str) -> anyhow::Error {
    let mut msg = format!("`{name}` exited with {status}");
    let diagnostics = strip_ansi(diagnostics.trim());
    if !diagnostics.is_empty() {
        msg.push('\n');
        msg.push_str(&diagnostics);
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nstdout:\n");
        msg.push_str(stdout);
    }
    anyhow!(msg)
}
