//! z.toml configuration parsing
//!
//! The same file format is used for the project file (`z.toml` at the
//! repository root) and the user file (`~/.config/z/config.toml` or
//! `--global <FILE>`). Every key is optional; layers are merged with
//! [`ZToml::merge`], the later layer winning key by key.
//!
//! Relative paths are resolved against the project root whichever layer
//! they come from, so a `[lint].log = "lint.log"` in the user file still
//! lands next to the project's z.toml. Use absolute paths in the user file
//! to point elsewhere.
//!
//! ## Example
//!
//! ```toml
//! backend = "bazel"
//!
//! [build]
//! cache_dir = "/mnt/bazel_cache"
//! output_dir = "output"
//!
//! [modules]
//! deva = "//src/deva:deva"
//! bench = "//bench:all"
//!
//! [format]
//! paths = ["include", "src", "protocols"]
//!
//! [lint]
//! paths = ["src"]
//! categories = ["clang-analyzer", "bugprone"]
//! max_errors = 0
//!
//! [deploy]
//! inventory = "deploy/inventory.ini"
//! playbook = "deploy/site.yml"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::error::{hints, ZError};

/// Root of a z.toml file
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ZToml {
    /// Build system driven by build/config/install/test
    pub backend: Option<BackendKind>,

    #[serde(default)]
    pub build: BuildSection,

    /// Extra or overriding module aliases (name -> target label)
    #[serde(default)]
    pub modules: BTreeMap<String, String>,

    #[serde(default)]
    pub format: PathsSection,

    #[serde(default)]
    pub line: PathsSection,

    #[serde(default)]
    pub lint: LintSection,

    #[serde(default)]
    pub deploy: DeploySection,
}

/// `[build]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Bazel `--disk_cache` directory
    pub cache_dir: Option<PathBuf>,
    /// Install destination (`xmake install -o`, copied bazel outputs)
    pub output_dir: Option<PathBuf>,
}

/// `[format]` and `[line]` sections
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub paths: Option<Vec<String>>,
}

/// `[lint]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LintSection {
    pub paths: Option<Vec<String>>,
    /// Directory holding compile_commands.json (clang-tidy `-p`)
    pub compile_commands: Option<PathBuf>,
    /// Where clang-tidy output is written and read back from
    pub log: Option<PathBuf>,
    /// Check-name prefixes that count as lint errors
    pub categories: Option<Vec<String>>,
    pub max_errors: Option<usize>,
}

/// `[deploy]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeploySection {
    pub inventory: Option<PathBuf>,
    pub playbook: Option<PathBuf>,
}

impl ZToml {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::parse(&content).map_err(|e| {
            ZError::config_error_with_hint(
                format!("{}: {:#}", path.display(), e),
                Some(e),
                hints::invalid_z_toml(),
            )
            .into()
        })
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse z.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce broken command lines
    pub fn validate(&self) -> Result<()> {
        for (name, target) in &self.modules {
            if name.is_empty() || name.contains(char::is_whitespace) {
                bail!("Invalid module name '{}': must be a single word", name);
            }
            if target.trim().is_empty() {
                bail!("Module '{}' maps to an empty target", name);
            }
        }

        if let Some(categories) = &self.lint.categories {
            if categories.is_empty() {
                bail!("[lint].categories must list at least one category");
            }
            if let Some(bad) = categories.iter().find(|c| c.trim().is_empty()) {
                bail!("[lint].categories contains an empty entry: {:?}", bad);
            }
        }

        for (section, paths) in [
            ("format", &self.format.paths),
            ("line", &self.line.paths),
            ("lint", &self.lint.paths),
        ] {
            if matches!(paths, Some(p) if p.is_empty()) {
                bail!("[{}].paths must list at least one path", section);
            }
        }

        Ok(())
    }

    /// Overlay `other` on top of `self`; keys set in `other` win
    pub fn merge(mut self, other: ZToml) -> ZToml {
        self.backend = other.backend.or(self.backend);

        self.build.cache_dir = other.build.cache_dir.or(self.build.cache_dir);
        self.build.output_dir = other.build.output_dir.or(self.build.output_dir);

        self.modules.extend(other.modules);

        self.format.paths = other.format.paths.or(self.format.paths);
        self.line.paths = other.line.paths.or(self.line.paths);

        self.lint.paths = other.lint.paths.or(self.lint.paths);
        self.lint.compile_commands = other.lint.compile_commands.or(self.lint.compile_commands);
        self.lint.log = other.lint.log.or(self.lint.log);
        self.lint.categories = other.lint.categories.or(self.lint.categories);
        self.lint.max_errors = other.lint.max_errors.or(self.lint.max_errors);

        self.deploy.inventory = other.deploy.inventory.or(self.deploy.inventory);
        self.deploy.playbook = other.deploy.playbook.or(self.deploy.playbook);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = ZToml::parse("").unwrap();
        assert_eq!(config, ZToml::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
backend = "xmake"

[build]
cache_dir = "/tmp/cache"
output_dir = "dist"

[modules]
bench = "//bench:all"

[format]
paths = ["src"]

[line]
paths = ["src", "include"]

[lint]
paths = ["src/deva"]
compile_commands = "build"
log = "out/tidy.log"
categories = ["bugprone"]
max_errors = 3

[deploy]
inventory = "hosts.ini"
playbook = "site.yml"
"#;

        let config = ZToml::parse(toml).unwrap();
        assert_eq!(config.backend, Some(BackendKind::Xmake));
        assert_eq!(config.build.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(config.modules["bench"], "//bench:all");
        assert_eq!(config.format.paths, Some(vec!["src".to_string()]));
        assert_eq!(config.lint.max_errors, Some(3));
        assert_eq!(config.lint.categories, Some(vec!["bugprone".to_string()]));
        assert_eq!(config.deploy.playbook, Some(PathBuf::from("site.yml")));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(ZToml::parse("backnd = \"bazel\"").is_err());
        assert!(ZToml::parse("[lint]\ncategory = [\"x\"]").is_err());
    }

    #[test]
    fn test_invalid_backend_rejected() {
        assert!(ZToml::parse("backend = \"cmake\"").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(ZToml::parse("[modules]\n\"two words\" = \"//a:b\"").is_err());
        assert!(ZToml::parse("[modules]\nfoo = \" \"").is_err());
        assert!(ZToml::parse("[lint]\ncategories = []").is_err());
        assert!(ZToml::parse("[format]\npaths = []").is_err());
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let user = ZToml::parse(
            r#"
backend = "xmake"
[build]
cache_dir = "/user/cache"
output_dir = "user-out"
[modules]
deva = "//user:deva"
tools = "//tools:all"
"#,
        )
        .unwrap();
        let project = ZToml::parse(
            r#"
backend = "bazel"
[build]
cache_dir = "/project/cache"
[modules]
deva = "//project:deva"
"#,
        )
        .unwrap();

        let merged = user.merge(project);
        assert_eq!(merged.backend, Some(BackendKind::Bazel));
        assert_eq!(merged.build.cache_dir, Some(PathBuf::from("/project/cache")));
        assert_eq!(merged.build.output_dir, Some(PathBuf::from("user-out")));
        assert_eq!(merged.modules["deva"], "//project:deva");
        assert_eq!(merged.modules["tools"], "//tools:all");
    }

    #[test]
    fn test_load_reports_path_and_hint() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("z.toml");
        std::fs::write(&path, "backend = 1").unwrap();

        let err = ZToml::load_from_path(&path).unwrap_err();
        let z_err = err.downcast_ref::<ZError>().unwrap();
        assert!(matches!(z_err, ZError::Config { hint: Some(_), .. }));
        assert!(z_err.to_string().contains("z.toml"));
    }
}
