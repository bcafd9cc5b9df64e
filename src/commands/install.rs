//! Install command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::backend::{BackendContext, BackendKind};
use crate::commands::Context;
use crate::exec::Output;
use crate::utils::terminal::print_success;

/// Install build outputs into the output directory
#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Build system to use instead of the configured one
    #[arg(long, value_enum, env = "Z_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Install destination (default: [build].output_dir, then `output`)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Bazel disk cache directory
    #[arg(long, env = "Z_BAZEL_CACHE", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Targets (xmake) or modules (bazel) to install; all when empty
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

impl InstallCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let backend = ctx.backend(self.backend);
        ctx.require_tool(backend.tool(), "installing")?;

        let backend_ctx = BackendContext::new(&ctx.settings, self.cache_dir, self.output);
        let plan = backend.install(&backend_ctx, &self.rest, false)?;
        ctx.shell.run_all(&plan, Output::Capture)?;

        if !ctx.dry_run() {
            print_success(&format!(
                "installed into {}",
                ctx.settings.resolve(&backend_ctx.output_dir).display()
            ));
        }
        Ok(())
    }
}
