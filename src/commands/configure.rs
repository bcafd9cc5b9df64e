//! Config command implementation (`z config`)

use anyhow::Result;
use clap::Args;

use crate::backend::{BackendContext, BackendKind, BuildMode};
use crate::commands::Context;
use crate::exec::Output;

/// Configure the build tree (xmake)
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Reset the configuration instead of setting a mode
    #[arg(short, long)]
    pub clean: bool,

    /// Build mode
    #[arg(short, long, value_enum, default_value_t = BuildMode::Debug)]
    pub mode: BuildMode,

    /// Build system to use instead of the configured one
    #[arg(long, value_enum, env = "Z_BACKEND")]
    pub backend: Option<BackendKind>,
}

impl ConfigCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let backend = ctx.backend(self.backend);
        let backend_ctx = BackendContext::new(&ctx.settings, None, None);

        let plan = backend.configure(&backend_ctx, self.clean, self.mode)?;
        if plan.is_empty() {
            return Ok(());
        }

        ctx.require_tool(backend.tool(), "configuring the build")?;
        ctx.shell.run_all(&plan, Output::Capture)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::live_context;

    #[test]
    fn test_bazel_config_runs_nothing() {
        // live context: would fail if it tried to spawn bazel on a bare host
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = live_context(tmp.path(), "backend = \"bazel\"");
        let cmd = ConfigCommand {
            clean: false,
            mode: BuildMode::Debug,
            backend: None,
        };
        cmd.execute(&ctx).unwrap();
    }
}
