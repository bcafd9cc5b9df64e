//! Process execution

pub mod shell;

pub use shell::{quote, Output, Shell, ShellCommand};
