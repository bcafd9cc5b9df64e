//! z - build helper for a C++ monorepo
//!
//! Every subcommand turns its arguments and the merged `z.toml` settings
//! into shell command lines, then runs them from the project root.
//!
//! ## Architecture
//!
//! ```text
//! cli → commands/ → backend/ (xmake, bazel) → exec::Shell → sh -c
//! ```

mod backend;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod lint_report;
mod modules;
mod utils;

use clap::Parser;

use cli::Cli;
use error::ZError;
use utils::terminal::print_error;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        match err.downcast_ref::<ZError>() {
            Some(z_err) => {
                z_err.display_with_hints();
                std::process::exit(z_err.exit_code());
            }
            None => {
                print_error(&format!("{:#}", err));
                std::process::exit(1);
            }
        }
    }
}
