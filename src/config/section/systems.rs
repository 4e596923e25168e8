//! `[systems]` section configuration.
//!
//! ```toml
//! [systems]
//! default = ["lms", "studio"]
//! aliases = { studio = "cms" }
//! settings = "devstack"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::System;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemsConfig {
    /// Systems built when none are requested.
    pub default: Vec<String>,
    /// Requested name -> directory name.
    pub aliases: BTreeMap<String, String>,
    /// Environment settings identifier passed to preprocess and collection.
    pub settings: String,
}

impl Default for SystemsConfig {
    fn default() -> Self {
        Self {
            default: vec!["lms".into(), "studio".into()],
            aliases: BTreeMap::from([("studio".into(), "cms".into())]),
            settings: "devstack".into(),
        }
    }
}

impl SystemsConfig {
    pub const DEFAULT: FieldPath = FieldPath::new("systems.default");
    pub const SETTINGS: FieldPath = FieldPath::new("systems.settings");

    /// Map a requested system name through the alias table.
    pub fn resolve(&self, name: &str) -> System {
        let dir = self.aliases.get(name).map_or(name, String::as_str);
        System {
            name: name.to_string(),
            dir: dir.to_string(),
        }
    }

    /// Resolve the requested systems (or the defaults), keeping first
    /// occurrence order and dropping repeats of the same directory.
    pub fn resolve_all(&self, requested: &[String]) -> Vec<System> {
        let names = if requested.is_empty() {
            self.default.as_slice()
        } else {
            requested
        };

        let mut systems: Vec<System> = Vec::with_capacity(names.len());
        for name in names {
            let system = self.resolve(name);
            if !systems.iter().any(|s| s.dir == system.dir) {
                systems.push(system);
            }
        }
        systems
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.default.is_empty() {
            diag.error(Self::DEFAULT, "at least one default system is required");
        }
        if self.settings.trim().is_empty() {
            diag.error(Self::SETTINGS, "settings identifier must not be empty");
        }
    }
}
