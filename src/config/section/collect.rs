//! `[collect]` section configuration.

use super::validate_command;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    /// Static collection command, run once per system.
    pub command: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            command: [
                "python",
                "manage.py",
                "$ASSETS_SYSTEM",
                "--settings=$ASSETS_SETTINGS",
                "collectstatic",
                "--noinput",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl CollectConfig {
    pub const COMMAND: FieldPath = FieldPath::new("collect.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_command(Self::COMMAND, &self.command, diag);
    }
}
