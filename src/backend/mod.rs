//! Build system backends
//!
//! ```text
//! commands/{build,config,install,test}.rs → backend/<kind>.rs → xmake | bazel
//! ```
//!
//! A backend never runs anything itself: it turns command-line input into a
//! plan of shell command lines, which the calling command hands to
//! [`Shell`](crate::exec::Shell). That keeps the exact command text testable.

pub mod bazel;
pub mod xmake;

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::exec::ShellCommand;
use crate::modules::ModuleTable;

pub use bazel::BazelBackend;
pub use xmake::XmakeBackend;

/// Which build system to drive
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// xmake (`xmake f`, `xmake b`, `xmake install`)
    Xmake,
    /// Bazel (`bazel build`, `bazel test`)
    #[default]
    Bazel,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Xmake => write!(f, "xmake"),
            BackendKind::Bazel => write!(f, "bazel"),
        }
    }
}

/// xmake build mode for `z config`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BuildMode {
    #[default]
    Debug,
    Releasedbg,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Debug => write!(f, "debug"),
            BuildMode::Releasedbg => write!(f, "releasedbg"),
        }
    }
}

/// Everything a backend needs to assemble its command lines
#[derive(Debug, Clone)]
pub struct BackendContext {
    pub modules: ModuleTable,
    /// Bazel `--disk_cache` directory
    pub cache_dir: PathBuf,
    /// Install destination
    pub output_dir: PathBuf,
}

impl BackendContext {
    /// Build the context from settings, letting command-line values win
    pub fn new(
        settings: &Settings,
        cache_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            modules: ModuleTable::builtin().with_overrides(&settings.modules),
            cache_dir: cache_dir.unwrap_or_else(|| settings.cache_dir.clone()),
            output_dir: output_dir.unwrap_or_else(|| settings.output_dir.clone()),
        }
    }
}

/// A build system z can drive
pub trait BuildBackend {
    fn kind(&self) -> BackendKind;

    /// Executable that must be on PATH
    fn tool(&self) -> &'static str;

    /// Configure the build tree; `clean` resets it instead
    fn configure(&self, ctx: &BackendContext, clean: bool, mode: BuildMode)
        -> Result<Vec<ShellCommand>>;

    /// Build the given modules (bazel) or pass `rest` through (xmake)
    fn build(&self, ctx: &BackendContext, rest: &[String]) -> Result<Vec<ShellCommand>>;

    /// Install into `ctx.output_dir`; `built` means the caller just ran
    /// [`build`](Self::build) for the same input
    fn install(&self, ctx: &BackendContext, rest: &[String], built: bool)
        -> Result<Vec<ShellCommand>>;

    /// Build and run tests
    fn test(
        &self,
        ctx: &BackendContext,
        rest: &[String],
        filter: Option<&str>,
    ) -> Result<Vec<ShellCommand>>;
}

/// Get the backend implementation for a kind
pub fn get_backend(kind: BackendKind) -> Box<dyn BuildBackend> {
    match kind {
        BackendKind::Xmake => Box::new(XmakeBackend::new()),
        BackendKind::Bazel => Box::new(BazelBackend::new()),
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> BackendContext {
    BackendContext {
        modules: ModuleTable::builtin(),
        cache_dir: PathBuf::from("/mnt/bazel_cache"),
        output_dir: PathBuf::from("output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZToml;

    #[test]
    fn test_get_backend() {
        assert_eq!(get_backend(BackendKind::Xmake).tool(), "xmake");
        assert_eq!(get_backend(BackendKind::Bazel).tool(), "bazel");
        assert_eq!(get_backend(BackendKind::Bazel).kind(), BackendKind::Bazel);
    }

    #[test]
    fn test_display() {
        assert_eq!(BackendKind::Xmake.to_string(), "xmake");
        assert_eq!(BuildMode::Releasedbg.to_string(), "releasedbg");
        assert_eq!(BuildMode::default().to_string(), "debug");
    }

    #[test]
    fn test_context_prefers_cli_values() {
        let toml = ZToml::parse(
            "[build]\ncache_dir = \"/cfg/cache\"\n[modules]\nbench = \"//bench:all\"\n",
        )
        .unwrap();
        let settings = Settings::from_toml(PathBuf::from("/repo"), vec![], toml);

        let ctx = BackendContext::new(&settings, Some(PathBuf::from("/cli/cache")), None);
        assert_eq!(ctx.cache_dir, PathBuf::from("/cli/cache"));
        assert_eq!(ctx.output_dir, PathBuf::from("output"));
        assert_eq!(ctx.modules.get("bench"), Some("//bench:all"));

        let ctx = BackendContext::new(&settings, None, None);
        assert_eq!(ctx.cache_dir, PathBuf::from("/cfg/cache"));
    }
}
