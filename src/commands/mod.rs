//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod build;
pub mod configure;
pub mod deploy;
pub mod format;
pub mod install;
pub mod line;
pub mod lint;
pub mod show;

use anyhow::Result;

use crate::backend::{get_backend, BackendKind, BuildBackend};
use crate::config::Settings;
use crate::exec::Shell;
use crate::utils::tools::require_tool;

/// State shared by every command in one invocation
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub shell: Shell,
}

impl Context {
    pub fn new(settings: Settings, verbose: bool, dry_run: bool) -> Self {
        let shell = Shell::new(settings.project_root.clone(), verbose, dry_run);
        Self { settings, shell }
    }

    pub fn verbose(&self) -> bool {
        self.shell.is_verbose()
    }

    pub fn dry_run(&self) -> bool {
        self.shell.is_dry_run()
    }

    /// Fail early when a tool is missing; dry runs never need it
    pub fn require_tool(&self, tool: &str, required_for: &str) -> Result<()> {
        if self.dry_run() {
            return Ok(());
        }
        let path = require_tool(tool, required_for)?;
        if self.verbose() {
            eprintln!("Using {} at {}", tool, path.display());
        }
        Ok(())
    }

    /// The backend picked on the command line, else the configured one
    pub fn backend(&self, choice: Option<BackendKind>) -> Box<dyn BuildBackend> {
        let kind = choice.unwrap_or(self.settings.backend);
        if self.verbose() {
            eprintln!("Backend: {}", kind);
        }
        get_backend(kind)
    }
}
