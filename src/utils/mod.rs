//! Shared helpers: paths, terminal output, tool lookup

pub mod paths;
pub mod terminal;
pub mod tools;
