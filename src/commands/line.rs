//! Line count command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::Context;
use crate::exec::{Output, ShellCommand};
use crate::utils::terminal::{create_spinner, print_info, print_warning};

/// Count lines of C/C++ sources and headers with `wc -l`
#[derive(Args, Debug)]
pub struct LineCommand {
    /// Directories to count (default: [line].paths)
    pub paths: Vec<String>,
}

/// Totals parsed back out of `wc -l` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSummary {
    pub files: usize,
    pub lines: usize,
}

pub fn line_count_command(paths: &[String]) -> ShellCommand {
    ShellCommand::new(format!(
        r#"find {} -iname "*.h" -o -iname "*.cc" -o -iname "*.c" | xargs wc -l"#,
        paths.join(" ")
    ))
}

/// Sum per-file counts; xargs may split the list, so there can be several
/// `total` lines, all of them skipped
pub fn summarize_wc(output: &str) -> LineSummary {
    let mut summary = LineSummary { files: 0, lines: 0 };
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(count), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(count) = count.parse::<usize>() else {
            continue;
        };
        if name == "total" && parts.next().is_none() {
            continue;
        }
        summary.files += 1;
        summary.lines += count;
    }
    summary
}

impl LineCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let requested = if self.paths.is_empty() {
            ctx.settings.line_paths.clone()
        } else {
            self.paths
        };

        let (paths, missing): (Vec<_>, Vec<_>) = requested
            .into_iter()
            .partition(|p| ctx.settings.resolve(p.as_ref()).exists());
        for path in &missing {
            print_warning(&format!("skipping {}: no such directory", path));
        }
        if paths.is_empty() {
            print_warning("nothing to count");
            return Ok(());
        }

        let cmd = line_count_command(&paths);
        let spinner = (!ctx.dry_run()).then(|| create_spinner("Counting lines..."));
        let result = ctx.shell.run(&cmd, Output::Quiet);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let result = result?;

        print!("{}", result.stdout);
        if !ctx.dry_run() {
            let summary = summarize_wc(&result.stdout);
            print_info(&format!(
                "{} lines in {} files",
                summary.lines, summary.files
            ));
        }
        Ok(())
    }
}
