//! Error types and helpers for user-friendly error messages
//!
//! Every failure the CLI reports on purpose goes through [`ZError`], which
//! carries an optional hint and decides the process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum ZError {
    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// A shell command exited with a non-zero status
    #[error("Command failed with exit code {}: {command}", display_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    /// None of the requested module names resolved to a target
    #[error("No known module in: {}", .names.join(", "))]
    UnknownModules { names: Vec<String>, known: Vec<String> },

    /// The lint pass found more diagnostics than allowed
    #[error("Lint found {total} error(s) (allowed: {allowed})")]
    LintFailed { total: usize, allowed: usize },

    /// A file the command needs does not exist
    #[error("{what} not found: {}", .path.display())]
    MissingFile {
        what: String,
        path: PathBuf,
        hint: Option<String>,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

impl ZError {
    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    pub fn command_failed(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
        }
    }

    pub fn missing_file(
        what: impl Into<String>,
        path: impl Into<PathBuf>,
        hint: Option<String>,
    ) -> Self {
        Self::MissingFile {
            what: what.into(),
            path: path.into(),
            hint,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ZError::CommandFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => 1,
            },
            _ => 1,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            ZError::Config { hint, .. } | ZError::MissingFile { hint, .. } => {
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            ZError::MissingTool {
                hint, required_for, ..
            } => {
                eprintln!("{} {}", style("Required for:").dim(), required_for);
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            ZError::UnknownModules { known, .. } => {
                eprintln!(
                    "\n{} known modules are: {}",
                    style("HINT:").yellow().bold(),
                    known.join(", ")
                );
                eprintln!("      run `z show modules` to list them with their targets");
            }
            ZError::LintFailed { .. } => {
                eprintln!(
                    "\n{} fix the diagnostics above or raise [lint].max_errors in z.toml",
                    style("HINT:").yellow().bold()
                );
            }
            ZError::CommandFailed { .. } => {}
        }

        eprintln!();
    }
}

/// Helper trait for adding hints to Result types
pub trait ResultExt<T> {
    /// Add context with a hint
    fn context_with_hint(
        self,
        context: impl Into<String>,
        hint: impl Into<String>,
    ) -> Result<T, ZError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context_with_hint(
        self,
        context: impl Into<String>,
        hint: impl Into<String>,
    ) -> Result<T, ZError> {
        self.map_err(|e| {
            ZError::config_error_with_hint(format!("{}: {}", context.into(), e), Some(e.into()), hint)
        })
    }
}

/// Installation hints for the wrapped tools
pub mod hints {
    pub fn xmake() -> &'static str {
        "Install xmake from https://xmake.io/ :\n\
         • curl -fsSL https://xmake.io/shget.text | bash\n\
         • Or switch backends: z build --backend bazel, or backend = \"bazel\" in z.toml"
    }

    pub fn bazel() -> &'static str {
        "Install Bazel (preferably through bazelisk):\n\
         • https://github.com/bazelbuild/bazelisk/releases\n\
         • Ubuntu: sudo apt install bazel"
    }

    pub fn clang_format() -> &'static str {
        "Install clang-format:\n\
         • Ubuntu: sudo apt install clang-format\n\
         • macOS: brew install clang-format"
    }

    pub fn clang_tidy() -> &'static str {
        "Install clang-tidy:\n\
         • Ubuntu: sudo apt install clang-tidy\n\
         • macOS: brew install llvm"
    }

    pub fn git() -> &'static str {
        "Install Git from https://git-scm.com/ or use your package manager:\n\
         • Ubuntu: sudo apt install git"
    }

    pub fn ansible() -> &'static str {
        "Install Ansible:\n\
         • pip install --user ansible\n\
         • Ubuntu: sudo apt install ansible"
    }

    pub fn invalid_z_toml() -> &'static str {
        "z.toml is invalid. Common issues:\n\
         • Unknown key or section (check spelling)\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • backend must be \"xmake\" or \"bazel\""
    }

    pub fn lint_log() -> &'static str {
        "Run `z lint` without --parse-only to produce the log first"
    }
}
