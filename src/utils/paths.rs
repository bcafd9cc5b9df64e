//! Path utilities for z

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::ResultExt;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "z.toml";

/// Find the nearest z.toml at or above `start`
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolve the directory z was asked to run in
pub fn resolve_start_dir(project_dir: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let dir = match project_dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    let resolved = dir.canonicalize().context_with_hint(
        format!("Failed to resolve project directory {}", dir.display()),
        "Pass an existing directory to -C/--project-dir",
    )?;
    Ok(resolved)
}

/// Default location of the user-level config file
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "z").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}
