//! Effective settings after layering defaults, user config and project config

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::backend::BackendKind;
use crate::config::z_toml::ZToml;
use crate::error::ZError;
use crate::utils::paths::{find_config_from, user_config_path};

pub const DEFAULT_CACHE_DIR: &str = "/mnt/bazel_cache";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_FORMAT_PATHS: &[&str] = &["include", "src", "protocols"];
pub const DEFAULT_LINE_PATHS: &[&str] = &["include", "src"];
pub const DEFAULT_LINT_PATHS: &[&str] = &["src"];
pub const DEFAULT_LINT_LOG: &str = "lint.log";
pub const DEFAULT_LINT_CATEGORIES: &[&str] = &[
    "clang-analyzer",
    "bugprone",
    "performance",
    "concurrency",
    "cert",
];
pub const DEFAULT_INVENTORY: &str = "deploy/inventory.ini";
pub const DEFAULT_PLAYBOOK: &str = "deploy/site.yml";

/// Lint settings
#[derive(Debug, Clone, Serialize)]
pub struct LintSettings {
    pub paths: Vec<String>,
    pub compile_commands: PathBuf,
    pub log: PathBuf,
    pub categories: Vec<String>,
    pub max_errors: usize,
}

/// Deploy settings
#[derive(Debug, Clone, Serialize)]
pub struct DeploySettings {
    pub inventory: PathBuf,
    pub playbook: PathBuf,
}

/// Fully resolved configuration for one invocation
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Directory every command runs in
    pub project_root: PathBuf,
    /// Config files that were read, lowest priority first
    pub sources: Vec<PathBuf>,
    pub backend: BackendKind,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Module aliases from config files, layered over the built-in table
    pub modules: BTreeMap<String, String>,
    pub format_paths: Vec<String>,
    pub line_paths: Vec<String>,
    pub lint: LintSettings,
    pub deploy: DeploySettings,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Load settings for a run started in `start_dir`.
    ///
    /// `global` replaces the default user config location; unlike the
    /// default location it must exist.
    pub fn load(start_dir: &Path, global: Option<&Path>) -> Result<Self> {
        let mut sources = Vec::new();
        let mut merged = ZToml::default();

        let user_file = match global {
            Some(path) => {
                if !path.is_file() {
                    return Err(ZError::missing_file(
                        "Global config",
                        path,
                        Some("Pass an existing file to -g/--global".to_string()),
                    )
                    .into());
                }
                Some(path.to_path_buf())
            }
            None => user_config_path().filter(|p| p.is_file()),
        };

        if let Some(path) = user_file {
            merged = merged.merge(ZToml::load_from_path(&path)?);
            sources.push(path);
        }

        let project_root = match find_config_from(start_dir) {
            Some(path) => {
                merged = merged.merge(ZToml::load_from_path(&path)?);
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| start_dir.to_path_buf());
                sources.push(path);
                root
            }
            None => start_dir.to_path_buf(),
        };

        Ok(Self::from_toml(project_root, sources, merged))
    }

    /// Fill every unset key with its built-in default
    pub fn from_toml(project_root: PathBuf, sources: Vec<PathBuf>, toml: ZToml) -> Self {
        Self {
            project_root,
            sources,
            backend: toml.backend.unwrap_or_default(),
            cache_dir: toml
                .build
                .cache_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            output_dir: toml
                .build
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            modules: toml.modules,
            format_paths: toml
                .format
                .paths
                .unwrap_or_else(|| strings(DEFAULT_FORMAT_PATHS)),
            line_paths: toml
                .line
                .paths
                .unwrap_or_else(|| strings(DEFAULT_LINE_PATHS)),
            lint: LintSettings {
                paths: toml
                    .lint
                    .paths
                    .unwrap_or_else(|| strings(DEFAULT_LINT_PATHS)),
                compile_commands: toml
                    .lint
                    .compile_commands
                    .unwrap_or_else(|| PathBuf::from(".")),
                log: toml
                    .lint
                    .log
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LINT_LOG)),
                categories: toml
                    .lint
                    .categories
                    .unwrap_or_else(|| strings(DEFAULT_LINT_CATEGORIES)),
                max_errors: toml.lint.max_errors.unwrap_or(0),
            },
            deploy: DeploySettings {
                inventory: toml
                    .deploy
                    .inventory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY)),
                playbook: toml
                    .deploy
                    .playbook
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYBOOK)),
            },
        }
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml(PathBuf::from("/repo"), vec![], ZToml::default());
        assert_eq!(settings.backend, BackendKind::Bazel);
        assert_eq!(settings.cache_dir, PathBuf::from("/mnt/bazel_cache"));
        assert_eq!(settings.output_dir, PathBuf::from("output"));
        assert_eq!(settings.format_paths, vec!["include", "src", "protocols"]);
        assert_eq!(settings.line_paths, vec!["include", "src"]);
        assert_eq!(settings.lint.max_errors, 0);
        assert_eq!(settings.lint.categories.len(), 5);
        assert_eq!(settings.deploy.playbook, PathBuf::from("deploy/site.yml"));
    }

    #[test]
    fn test_project_config_sets_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::fs::write(root.join("z.toml"), "backend = \"xmake\"\n").unwrap();
        let nested = root.join("src/pain");
        std::fs::create_dir_all(&nested).unwrap();

        let global = root.join("empty-user.toml");
        std::fs::write(&global, "").unwrap();

        let settings = Settings::load(&nested, Some(&global)).unwrap();
        assert_eq!(settings.project_root, root);
        assert_eq!(settings.backend, BackendKind::Xmake);
        assert_eq!(settings.sources, vec![global, root.join("z.toml")]);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let global = root.join("user.toml");
        std::fs::write(&global, "[build]\ncache_dir = \"/user\"\noutput_dir = \"u\"\n").unwrap();
        std::fs::write(root.join("z.toml"), "[build]\ncache_dir = \"/project\"\n").unwrap();

        let settings = Settings::load(root, Some(&global)).unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/project"));
        assert_eq!(settings.output_dir, PathBuf::from("u"));
    }

    #[test]
    fn test_user_file_paths_resolve_against_project_root() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        let user_dir = base.join("home/.config/z");
        std::fs::create_dir_all(&user_dir).unwrap();
        let global = user_dir.join("config.toml");
        std::fs::write(&global, "[lint]\nlog = \"tidy/lint.log\"\n").unwrap();
        let project = base.join("repo");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("z.toml"), "").unwrap();

        let settings = Settings::load(&project, Some(&global)).unwrap();
        assert_eq!(
            settings.resolve(&settings.lint.log),
            project.join("tidy/lint.log")
        );
    }

    #[test]
    fn test_missing_global_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = Settings::load(tmp.path(), Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ZError>(),
            Some(ZError::MissingFile { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn test_user_config_from_xdg_dir() {
        let tmp = TempDir::new().unwrap();
        let config_home = tmp.path().join("config");
        std::fs::create_dir_all(config_home.join("z")).unwrap();
        std::fs::write(config_home.join("z/config.toml"), "backend = \"xmake\"\n").unwrap();
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();

        let previous = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", &config_home);
        let settings = Settings::load(&project, None);
        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }

        let settings = settings.unwrap();
        assert_eq!(settings.backend, BackendKind::Xmake);
        assert_eq!(settings.sources, vec![config_home.join("z/config.toml")]);
    }

    #[test]
    fn test_resolve_relative_paths() {
        let settings = Settings::from_toml(PathBuf::from("/repo"), vec![], ZToml::default());
        assert_eq!(
            settings.resolve(Path::new("lint.log")),
            PathBuf::from("/repo/lint.log")
        );
        assert_eq!(settings.resolve(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
