//! Show command implementation
//!
//! Read-only views of what z knows: the module table, the effective
//! settings, and which external tools are installed.

use anyhow::Result;
use clap::{Args, ValueEnum};
use console::style;
use serde::Serialize;

use crate::commands::Context;
use crate::modules::{ModuleEntry, ModuleTable, Origin};
use crate::utils::terminal::print_header;
use crate::utils::tools::{check_tools, ToolInfo, KNOWN_TOOLS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShowSubject {
    /// Module aliases and their targets
    #[default]
    Modules,
    /// Effective settings after merging config files
    Config,
    /// External tools and their versions
    Tools,
}

/// Show modules, configuration or tools
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// What to show
    #[arg(value_enum, default_value_t = ShowSubject::Modules)]
    pub subject: ShowSubject,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ToolRow {
    name: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<std::path::PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl ToolRow {
    fn new(name: String, info: Option<ToolInfo>) -> Self {
        match info {
            Some(info) => Self {
                name,
                found: true,
                path: Some(info.path),
                version: info.version,
            },
            None => Self {
                name,
                found: false,
                path: None,
                version: None,
            },
        }
    }
}

impl ShowCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        match self.subject {
            ShowSubject::Modules => {
                let table = ModuleTable::builtin().with_overrides(&ctx.settings.modules);
                let entries: Vec<&ModuleEntry> = table.iter().collect();
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    print_modules(&entries);
                }
            }
            ShowSubject::Config => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
                } else {
                    print_config(ctx);
                }
            }
            ShowSubject::Tools => {
                let rows: Vec<ToolRow> = check_tools(KNOWN_TOOLS)
                    .into_iter()
                    .map(|(name, info)| ToolRow::new(name, info))
                    .collect();
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print_tools(&rows);
                }
            }
        }
        Ok(())
    }
}

fn print_modules(entries: &[&ModuleEntry]) {
    print_header("Modules");
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        let origin = match entry.origin {
            Origin::Builtin => style("builtin").dim(),
            Origin::Config => style("z.toml").cyan(),
        };
        println!(
            "  {:<width$}  {}  ({})",
            entry.name,
            entry.target,
            origin,
            width = width
        );
    }
}

fn print_config(ctx: &Context) {
    let s = &ctx.settings;
    print_header("Configuration");
    println!("  project root    {}", s.project_root.display());
    if s.sources.is_empty() {
        println!("  config files    (none, using defaults)");
    } else {
        for (i, source) in s.sources.iter().enumerate() {
            let label = if i == 0 { "config files" } else { "" };
            println!("  {:<14}  {}", label, source.display());
        }
    }
    println!("  backend         {}", s.backend);
    println!("  cache dir       {}", s.cache_dir.display());
    println!("  output dir      {}", s.output_dir.display());
    println!("  format paths    {}", s.format_paths.join(" "));
    println!("  line paths      {}", s.line_paths.join(" "));
    println!("  lint paths      {}", s.lint.paths.join(" "));
    println!("  lint log        {}", s.lint.log.display());
    println!("  lint categories {}", s.lint.categories.join(", "));
    println!("  max errors      {}", s.lint.max_errors);
    println!("  inventory       {}", s.deploy.inventory.display());
    println!("  playbook        {}", s.deploy.playbook.display());
}

fn print_tools(rows: &[ToolRow]) {
    print_header("Tools");
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in rows {
        match &row.path {
            Some(path) => println!(
                "  {} {:<width$}  {}  {}",
                style("✓").green(),
                row.name,
                row.version.as_deref().unwrap_or("unknown version"),
                style(path.display()).dim(),
                width = width
            ),
            None => println!(
                "  {} {:<width$}  {}",
                style("✗").red(),
                row.name,
                style("not found").red(),
                width = width
            ),
        }
    }
}
