//! Build command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::backend::{BackendContext, BackendKind};
use crate::commands::Context;
use crate::exec::Output;
use crate::utils::terminal::print_success;

/// Build modules with the configured build system
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Install the build outputs afterwards
    #[arg(short, long)]
    pub install: bool,

    /// Bazel disk cache directory
    #[arg(long, env = "Z_BAZEL_CACHE", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Build system to use instead of the configured one
    #[arg(long, value_enum, env = "Z_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Modules to build (bazel) or arguments passed to `xmake b` (xmake)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let backend = ctx.backend(self.backend);
        ctx.require_tool(backend.tool(), "building")?;

        let backend_ctx = BackendContext::new(&ctx.settings, self.cache_dir, None);

        let plan = backend.build(&backend_ctx, &self.rest)?;
        ctx.shell.run_all(&plan, Output::Inherit)?;

        if self.install {
            if ctx.verbose() {
                eprintln!("Installing to {}...", backend_ctx.output_dir.display());
            }
            let plan = backend.install(&backend_ctx, &self.rest, true)?;
            ctx.shell.run_all(&plan, Output::Capture)?;
        }

        if !ctx.dry_run() {
            print_success(&format!("{} build finished", backend.kind()));
        }
        Ok(())
    }
}
