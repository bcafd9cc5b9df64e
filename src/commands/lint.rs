//! Lint command implementation
//!
//! Runs clang-tidy over the sources, writes everything it prints to a log
//! file, then classifies the log. clang-tidy's own exit status is ignored;
//! the category counts decide whether the pass fails.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;

use crate::commands::Context;
use crate::error::{hints, ZError};
use crate::exec::{Output, ShellCommand};
use crate::lint_report::LintClassifier;
use crate::utils::paths::ensure_dir;
use crate::utils::terminal::{create_spinner, print_success, print_warning};

/// Run clang-tidy and count diagnostics by category
#[derive(Args, Debug)]
pub struct LintCommand {
    /// Log file clang-tidy output is written to (default: [lint].log)
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Classify an existing log without running clang-tidy
    #[arg(long)]
    pub parse_only: bool,

    /// Number of errors tolerated before the pass fails
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,

    /// Directories to lint (default: [lint].paths)
    pub paths: Vec<String>,
}

pub fn clang_tidy_command(paths: &[String], compile_commands: &Path, log: &Path) -> ShellCommand {
    ShellCommand::new(format!(
        r"find {} -regex '.*\.\(cc\|h\)' | xargs -r -n1 -P $(nproc) clang-tidy -p {} --quiet > {} 2>&1",
        paths.join(" "),
        compile_commands.display(),
        log.display()
    ))
}

impl LintCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let settings = &ctx.settings;
        let log = settings.resolve(self.log.as_deref().unwrap_or(&settings.lint.log));
        let max_errors = self.max_errors.unwrap_or(settings.lint.max_errors);

        if !self.parse_only {
            let paths = if self.paths.is_empty() {
                settings.lint.paths.clone()
            } else {
                self.paths
            };
            Self::run_clang_tidy(ctx, &paths, &log)?;
            if ctx.dry_run() {
                return Ok(());
            }
        }

        if !log.is_file() {
            return Err(ZError::missing_file(
                "clang-tidy log",
                &log,
                Some(hints::lint_log().to_string()),
            )
            .into());
        }
        let content = std::fs::read_to_string(&log)
            .with_context(|| format!("Failed to read {}", log.display()))?;

        let classifier = LintClassifier::new(&settings.lint.categories)?;
        let report = classifier.classify(&content);
        report.print();

        if report.total > max_errors {
            return Err(ZError::LintFailed {
                total: report.total,
                allowed: max_errors,
            }
            .into());
        }

        print_success(&format!(
            "lint passed ({} error(s), {} allowed)",
            report.total, max_errors
        ));
        Ok(())
    }

    fn run_clang_tidy(ctx: &Context, paths: &[String], log: &Path) -> Result<()> {
        let (paths, missing): (Vec<String>, Vec<String>) = paths
            .iter()
            .cloned()
            .partition(|p| ctx.settings.resolve(p.as_ref()).exists());
        for path in &missing {
            print_warning(&format!("skipping {}: no such directory", path));
        }
        if paths.is_empty() {
            anyhow::bail!("No lint paths exist: {}", missing.join(", "));
        }

        ctx.require_tool("clang-tidy", "linting")?;
        if let Some(parent) = log.parent() {
            if !ctx.dry_run() {
                ensure_dir(parent)?;
            }
        }

        let compile_commands = ctx.settings.resolve(&ctx.settings.lint.compile_commands);
        let cmd = clang_tidy_command(&paths, &compile_commands, log);

        let spinner = (!ctx.dry_run()).then(|| create_spinner("Running clang-tidy..."));
        let result = ctx.shell.run_unchecked(&cmd, Output::Quiet);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let result = result?;

        if ctx.verbose() && !result.success {
            eprintln!(
                "clang-tidy exited with {:?}; classifying its log",
                result.exit_code
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::live_context;

    fn parse_only(log: &str, max_errors: Option<usize>) -> LintCommand {
        LintCommand {
            log: Some(PathBuf::from(log)),
            parse_only: true,
            max_errors,
            paths: vec![],
        }
    }

    #[test]
    fn test_clang_tidy_command() {
        let cmd = clang_tidy_command(
            &["src".to_string()],
            Path::new("/repo"),
            Path::new("/repo/lint.log"),
        );
        assert_eq!(
            cmd.as_str(),
            r"find src -regex '.*\.\(cc\|h\)' | xargs -r -n1 -P $(nproc) clang-tidy -p /repo --quiet > /repo/lint.log 2>&1"
        );
    }

    #[test]
    fn test_parse_only_passes_on_clean_log() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("tidy.log"),
            "a.cc:1:1: warning: use auto [modernize-use-auto]\n",
        )
        .unwrap();
        let ctx = live_context(tmp.path(), "");
        parse_only("tidy.log", None).execute(&ctx).unwrap();
    }

    #[test]
    fn test_parse_only_fails_over_threshold() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("tidy.log"),
            "a.cc:1:1: warning: moved [bugprone-use-after-move]\n\
             b.cc:2:1: error: null [clang-analyzer-core.NullDereference]\n",
        )
        .unwrap();
        let ctx = live_context(tmp.path(), "");

        let err = parse_only("tidy.log", None).execute(&ctx).unwrap_err();
        match err.downcast_ref::<ZError>() {
            Some(ZError::LintFailed { total, allowed }) => {
                assert_eq!(*total, 2);
                assert_eq!(*allowed, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        parse_only("tidy.log", Some(2)).execute(&ctx).unwrap();
    }

    #[test]
    fn test_configured_categories_and_threshold() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("lint.log"),
            "a.cc:1:1: warning: use auto [modernize-use-auto]\n",
        )
        .unwrap();
        let ctx = live_context(tmp.path(), "[lint]\ncategories = [\"modernize\"]\n");
        let cmd = LintCommand {
            log: None,
            parse_only: true,
            max_errors: None,
            paths: vec![],
        };
        assert!(cmd.execute(&ctx).is_err());

        let ctx = live_context(
            tmp.path(),
            "[lint]\ncategories = [\"modernize\"]\nmax_errors = 1\n",
        );
        let cmd = LintCommand {
            log: None,
            parse_only: true,
            max_errors: None,
            paths: vec![],
        };
        cmd.execute(&ctx).unwrap();
    }

    #[test]
    fn test_missing_log() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = live_context(tmp.path(), "");
        let err = parse_only("absent.log", None).execute(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ZError>(),
            Some(ZError::MissingFile { .. })
        ));
    }
}
