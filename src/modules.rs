//! Module aliases and their build targets
//!
//! A module is a short name (`deva`, `pain`, ...) standing for one bazel
//! target label. The built-in table covers the services in this repository;
//! `[modules]` in z.toml adds to it or overrides entries.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::error::ZError;

/// Target built when no module is named
pub const DEFAULT_TARGET: &str = "//src/...";

const BUILTIN_MODULES: &[(&str, &str)] = &[
    ("deva", "//src/deva:deva"),
    ("asura", "//src/asura:asura"),
    ("manusya", "//src/manusya:manusya"),
    ("pain", "//src/pain:pain"),
    ("sad", "//src/sad:sad"),
];

/// Where a table entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Builtin,
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    pub name: String,
    pub target: String,
    pub origin: Origin,
}

/// Outcome of resolving user-supplied names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Targets in the order their names were given
    pub targets: Vec<String>,
    /// Names that matched neither a module nor a target label
    pub unknown: Vec<String>,
}

/// Name → target mapping
#[derive(Debug, Clone)]
pub struct ModuleTable {
    entries: BTreeMap<String, ModuleEntry>,
}

/// Whether `name` is already a target label rather than an alias
pub fn is_target_label(name: &str) -> bool {
    name.starts_with("//") || name.starts_with('@')
}

impl ModuleTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN_MODULES
            .iter()
            .map(|(name, target)| {
                (
                    name.to_string(),
                    ModuleEntry {
                        name: name.to_string(),
                        target: target.to_string(),
                        origin: Origin::Builtin,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Layer config entries over this table
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (name, target) in overrides {
            self.entries.insert(
                name.clone(),
                ModuleEntry {
                    name: name.clone(),
                    target: target.clone(),
                    origin: Origin::Config,
                },
            );
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.target.as_str())
    }

    /// Entries sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Map names to targets, collecting names that match nothing
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Resolution {
        let mut resolution = Resolution::default();
        for name in names {
            let name = name.as_ref();
            if let Some(target) = self.get(name) {
                resolution.targets.push(target.to_string());
            } else if is_target_label(name) {
                resolution.targets.push(name.to_string());
            } else {
                resolution.unknown.push(name.to_string());
            }
        }
        resolution
    }

    /// Targets for a build or test run.
    ///
    /// No names selects [`DEFAULT_TARGET`]. Unknown names are reported through
    /// `warn` and skipped; if nothing is left the call fails.
    pub fn targets_for<S: AsRef<str>>(
        &self,
        names: &[S],
        mut warn: impl FnMut(&str),
    ) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(vec![DEFAULT_TARGET.to_string()]);
        }

        let resolution = self.resolve(names);
        for name in &resolution.unknown {
            warn(&format!("Unknown target: {}", name));
        }

        if resolution.targets.is_empty() {
            return Err(ZError::UnknownModules {
                names: resolution.unknown,
                known: self.names(),
            }
            .into());
        }

        Ok(resolution.targets)
    }
}
