//! Configuration errors.

use super::FieldPath;
use crate::utils::plural::plural_count;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed assets config")]
    Toml(#[from] toml::de::Error),

    // No #[from]: source() would print the problems twice
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

/// One invalid field and, when there is an obvious fix, how to make it.
#[derive(Debug)]
struct Problem {
    field: FieldPath,
    message: String,
    hint: Option<String>,
}

impl Problem {
    /// Top-level table the field lives in (`styles` for `styles.command`).
    fn section(&self) -> &'static str {
        let path = self.field.as_str();
        path.split_once('.').map_or(path, |(section, _)| section)
    }
}

/// Problems found while validating one assets config.
///
/// Sections push into a shared collector so a single run reports every
/// broken field, grouped under its table.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    problems: Vec<Problem>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.problems.push(Problem {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.problems.push(Problem {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// Something that may still work at run time; logged, never fatal.
    pub fn note(&mut self, field: FieldPath, message: impl Into<String>) {
        crate::log!("hint"; "[{}] {}", field.as_str(), message.into());
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self))
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut problems: Vec<_> = self.problems.iter().collect();
        problems.sort_by_key(|p| p.section());

        let heading = format!("invalid config, {}:", plural_count(problems.len(), "problem"));
        write!(f, "{}", heading.red().bold())?;

        let mut current = None;
        for problem in problems {
            if current != Some(problem.section()) {
                current = Some(problem.section());
                write!(f, "\n  {}", format!("[{}]", problem.section()).cyan())?;
            }
            write!(f, "\n    {} {}", "→".red(), problem.message)?;
            if let Some(hint) = &problem.hint {
                write!(f, "\n      {} {hint}", "hint:".yellow())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problems_grouped_by_table() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("styles.command"), "command must name a program");
        diag.error_with_hint(
            FieldPath::new("theme.name"),
            "name is required when custom is set",
            "set theme.name",
        );
        diag.error(FieldPath::new("styles.extension"), "extension must not be empty");
        assert_eq!(diag.len(), 3);

        owo_colors::set_override(false);
        let text = diag.into_result().unwrap_err().to_string();
        assert!(text.starts_with("invalid config, 3 problems:"));
        assert_eq!(text.matches("[styles]").count(), 1);
        assert!(text.find("[styles]").unwrap() < text.find("[theme]").unwrap());
        assert!(text.contains("hint: set theme.name"));
    }

    #[test]
    fn test_empty_collector_is_ok() {
        let diag = ConfigDiagnostics::new();
        assert!(diag.is_empty());
        assert!(diag.into_result().is_ok());
    }

    #[test]
    fn test_section_of_nested_field() {
        let problem = Problem {
            field: FieldPath::new("systems.aliases.studio"),
            message: String::new(),
            hint: None,
        };
        assert_eq!(problem.section(), "systems");
    }
}
