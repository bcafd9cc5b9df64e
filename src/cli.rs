//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    build::BuildCommand, configure::ConfigCommand, deploy::DeployCommand,
    format::FormatCommand, install::InstallCommand, line::LineCommand, lint::LintCommand,
    show::ShowCommand, test::TestCommand, Context,
};
use crate::config::Settings;
use crate::utils::paths::resolve_start_dir;
use crate::utils::terminal::disable_colors;

/// z - build, check and ship the C++ services in this repository
///
/// Wraps xmake, bazel, clang-format, clang-tidy and ansible-playbook behind
/// one set of subcommands.
#[derive(Parser, Debug)]
#[command(name = "z")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// User-level config file (default: <config dir>/z/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub global: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print commands instead of running them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build modules (all of src/ when none are named)
    #[command(visible_alias = "b")]
    Build(BuildCommand),

    /// Configure the xmake project
    Config(ConfigCommand),

    /// Format sources with clang-format
    #[command(visible_alias = "f")]
    Format(FormatCommand),

    /// Count lines of C/C++ code
    #[command(visible_aliases = ["lines", "l"])]
    Line(LineCommand),

    /// Run clang-tidy and summarize its findings
    Lint(LintCommand),

    /// Install built binaries into the output directory
    #[command(visible_alias = "i")]
    Install(InstallCommand),

    /// Deploy with ansible-playbook
    #[command(visible_alias = "d")]
    Deploy(DeployCommand),

    /// Build and run unit tests
    #[command(visible_alias = "t")]
    Test(TestCommand),

    /// Show modules, configuration or tools
    #[command(visible_alias = "s")]
    Show(ShowCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            disable_colors();
        }

        let start_dir = resolve_start_dir(self.project_dir.as_deref())?;
        let settings = Settings::load(&start_dir, self.global.as_deref())?;
        if self.verbose {
            eprintln!("Project root: {}", settings.project_root.display());
        }
        let ctx = Context::new(settings, self.verbose, self.dry_run);

        match self.command {
            Commands::Build(cmd) => cmd.execute(&ctx),
            Commands::Config(cmd) => cmd.execute(&ctx),
            Commands::Format(cmd) => cmd.execute(&ctx),
            Commands::Line(cmd) => cmd.execute(&ctx),
            Commands::Lint(cmd) => cmd.execute(&ctx),
            Commands::Install(cmd) => cmd.execute(&ctx),
            Commands::Deploy(cmd) => cmd.execute(&ctx),
            Commands::Test(cmd) => cmd.execute(&ctx),
            Commands::Show(cmd) => cmd.execute(&ctx),
        }
    }
}
