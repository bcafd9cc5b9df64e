//! Shell command execution
//!
//! Every external tool is driven through `sh -c <line>` so that pipelines
//! such as `find ... | xargs clang-format` work exactly as typed.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::error::ZError;
use crate::utils::terminal::print_command;

/// A fully interpolated shell command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    line: String,
    echo: bool,
}

impl ShellCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            echo: false,
        }
    }

    /// Join a program and its arguments with single spaces.
    ///
    /// Arguments are not quoted; they reach the shell as written.
    pub fn from_parts<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = program.to_string();
        for arg in args {
            let arg = arg.as_ref();
            if arg.is_empty() {
                continue;
            }
            line.push(' ');
            line.push_str(arg);
        }
        Self::new(line)
    }

    /// Always echo this command before running it, even without --verbose
    pub fn echoed(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn is_echoed(&self) -> bool {
        self.echo
    }
}

/// Single-quote a value so `sh` passes it through untouched (no globbing,
/// no expansion). Embedded quotes become `'\''`.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// How the child's stdout/stderr are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Collect both streams, print them once the command finishes
    Capture,
    /// Collect both streams without printing them
    Quiet,
    /// Let the child write straight to our terminal
    Inherit,
}

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code (None when killed by a signal)
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(
        status: ExitStatus,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            stdout,
            stderr,
            duration,
        }
    }

    /// The result reported for a command skipped by --dry-run
    pub fn skipped() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
        }
    }
}

/// Runs shell command lines from the project root
#[derive(Debug, Clone)]
pub struct Shell {
    root: PathBuf,
    verbose: bool,
    dry_run: bool,
}

impl Shell {
    pub fn new(root: impl Into<PathBuf>, verbose: bool, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            verbose,
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Run one command line and fail on a non-zero exit status
    pub fn run(&self, cmd: &ShellCommand, output: Output) -> Result<CommandResult> {
        let result = self.run_unchecked(cmd, output)?;
        if !result.success {
            return Err(ZError::command_failed(cmd.as_str(), result.exit_code).into());
        }
        Ok(result)
    }

    /// Run several command lines in order, stopping at the first failure
    pub fn run_all(&self, cmds: &[ShellCommand], output: Output) -> Result<Vec<CommandResult>> {
        cmds.iter().map(|cmd| self.run(cmd, output)).collect()
    }

    /// Run one command line and hand back its result whatever the exit status
    pub fn run_unchecked(&self, cmd: &ShellCommand, output: Output) -> Result<CommandResult> {
        if self.verbose || self.dry_run || cmd.is_echoed() {
            print_command(cmd.as_str());
        }

        if self.dry_run {
            return Ok(CommandResult::skipped());
        }

        let start = Instant::now();

        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd.as_str()).current_dir(&self.root);

        let result = if output == Output::Inherit {
            command.stdin(Stdio::inherit());
            command.stdout(Stdio::inherit());
            command.stderr(Stdio::inherit());

            let status = command
                .status()
                .with_context(|| format!("Failed to execute: {}", cmd))?;
            CommandResult::from_status(status, String::new(), String::new(), start.elapsed())
        } else {
            command.stdin(Stdio::null());
            let out = command
                .output()
                .with_context(|| format!("Failed to execute: {}", cmd))?;
            let stdout = String::from_utf8_lossy(&out.stdout).to_string();
            let stderr = String::from_utf8_lossy(&out.stderr).to_string();
            CommandResult::from_status(out.status, stdout, stderr, start.elapsed())
        };

        if output == Output::Capture {
            if !result.stdout.is_empty() {
                print!("{}", result.stdout);
            }
            if !result.stderr.is_empty() {
                eprint!("{}", result.stderr);
            }
        }

        if self.verbose {
            eprintln!(
                "  finished in {:.2}s (exit code {})",
                result.duration.as_secs_f64(),
                result
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string())
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_parts_joins_with_spaces() {
        let cmd = ShellCommand::from_parts("xmake", ["b", "-v", "", "pain"]);
        assert_eq!(cmd.as_str(), "xmake b -v pain");
        assert!(!cmd.is_echoed());
        assert!(cmd.echoed().is_echoed());
    }

    #[test]
    fn test_quote_survives_the_shell() {
        assert_eq!(quote("FileStream.*"), "'FileStream.*'");
        assert_eq!(quote("it's"), r"'it'\''s'");

        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("test_pain")).unwrap();
        std::fs::write(tmp.path().join("test_pain/a.cc"), "").unwrap();
        let shell = Shell::new(tmp.path(), false, false);
        let cmd = ShellCommand::new(format!("echo {} {}", quote("test_pain/*"), quote("it's")));
        let result = shell.run(&cmd, Output::Quiet).unwrap();
        assert_eq!(result.stdout, "test_pain/* it's\n");
    }

    #[test]
    fn test_capture_output() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::new(tmp.path(), false, false);
        let result = shell
            .run(&ShellCommand::new("echo hello; echo oops >&2"), Output::Quiet)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn test_runs_in_project_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("marker"), "").unwrap();
        let shell = Shell::new(tmp.path(), false, false);
        let result = shell.run(&ShellCommand::new("ls"), Output::Quiet).unwrap();
        assert!(result.stdout.contains("marker"));
    }

    #[test]
    fn test_nonzero_exit_is_error() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::new(tmp.path(), false, false);
        let err = shell
            .run(&ShellCommand::new("exit 7"), Output::Quiet)
            .unwrap_err();
        match err.downcast_ref::<ZError>() {
            Some(ZError::CommandFailed { command, exit_code }) => {
                assert_eq!(command, "exit 7");
                assert_eq!(*exit_code, Some(7));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let result = shell
            .run_unchecked(&ShellCommand::new("exit 7"), Output::Quiet)
            .unwrap();
        assert!(!result.success);
    }

    #[test]
    fn test_dry_run_does_not_spawn() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::new(tmp.path(), false, true);
        let result = shell
            .run(&ShellCommand::new("touch created"), Output::Capture)
            .unwrap();
        assert!(result.success);
        assert!(!tmp.path().join("created").exists());
    }

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::new(tmp.path(), false, false);
        let cmds = vec![
            ShellCommand::new("touch one"),
            ShellCommand::new("false"),
            ShellCommand::new("touch two"),
        ];
        assert!(shell.run_all(&cmds, Output::Quiet).is_err());
        assert!(tmp.path().join("one").exists());
        assert!(!tmp.path().join("two").exists());
    }
}
