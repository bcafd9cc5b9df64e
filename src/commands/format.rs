//! Format command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::Context;
use crate::exec::{Output, ShellCommand};
use crate::utils::terminal::{print_success, print_warning};

/// Run clang-format in place over the C++ and proto sources
#[derive(Args, Debug)]
pub struct FormatCommand {
    /// Show `git diff` of what changed afterwards
    #[arg(long)]
    pub diff: bool,

    /// Directories to format (default: [format].paths)
    pub paths: Vec<String>,
}

/// clang-format invocation for one directory
pub fn clang_format_command(path: &str) -> ShellCommand {
    ShellCommand::new(format!(
        r"find {} -regex '.*\.\(cc\|h\|proto\)' | xargs -r -n1 -P $(nproc) clang-format -i --style=file --fallback-style=none",
        path
    ))
}

impl FormatCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let paths = if self.paths.is_empty() {
            ctx.settings.format_paths.clone()
        } else {
            self.paths
        };

        let mut plan = Vec::new();
        for path in &paths {
            if ctx.settings.resolve(path.as_ref()).exists() {
                plan.push(clang_format_command(path));
            } else {
                print_warning(&format!("skipping {}: no such directory", path));
            }
        }

        if !plan.is_empty() {
            ctx.require_tool("clang-format", "formatting")?;
            ctx.shell.run_all(&plan, Output::Capture)?;
        }

        if self.diff {
            ctx.require_tool("git", "showing the formatting diff")?;
            ctx.shell
                .run(&ShellCommand::new("git --no-pager diff"), Output::Inherit)?;
        }

        if !ctx.dry_run() && !plan.is_empty() {
            print_success(&format!("formatted {}", paths.join(", ")));
        }
        Ok(())
    }
}
