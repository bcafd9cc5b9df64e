//! Deploy command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::commands::Context;
use crate::error::ZError;
use crate::exec::{Output, ShellCommand};
use crate::utils::terminal::print_success;

/// Deploy with ansible-playbook
#[derive(Args, Debug)]
pub struct DeployCommand {
    /// Ansible inventory file (default: [deploy].inventory)
    #[arg(short, long, env = "Z_DEPLOY_INVENTORY", value_name = "FILE")]
    pub inventory: Option<PathBuf>,

    /// Playbook to run (default: [deploy].playbook)
    #[arg(short, long, value_name = "FILE")]
    pub playbook: Option<PathBuf>,

    /// Restrict the run to these hosts or groups
    #[arg(short, long, value_name = "HOSTS")]
    pub limit: Option<String>,

    /// Only run tasks with these tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Dry run on the ansible side: report changes without making them
    #[arg(long)]
    pub check: bool,

    /// Extra arguments passed to ansible-playbook
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Options the ansible-playbook line is assembled from
#[derive(Debug, Clone)]
pub struct PlaybookRun<'a> {
    pub inventory: &'a Path,
    pub playbook: &'a Path,
    pub limit: Option<&'a str>,
    pub tags: &'a [String],
    pub check: bool,
    pub extra: &'a [String],
}

pub fn ansible_command(run: &PlaybookRun<'_>) -> ShellCommand {
    let mut args = vec![
        "-i".to_string(),
        run.inventory.display().to_string(),
        run.playbook.display().to_string(),
    ];
    if let Some(limit) = run.limit {
        args.push("--limit".to_string());
        args.push(limit.to_string());
    }
    if !run.tags.is_empty() {
        args.push("--tags".to_string());
        args.push(run.tags.join(","));
    }
    if run.check {
        args.push("--check".to_string());
    }
    args.extend(run.extra.iter().cloned());
    ShellCommand::from_parts("ansible-playbook", args).echoed()
}

impl DeployCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let settings = &ctx.settings;
        let inventory = self
            .inventory
            .unwrap_or_else(|| settings.deploy.inventory.clone());
        let playbook = self
            .playbook
            .unwrap_or_else(|| settings.deploy.playbook.clone());

        if !ctx.dry_run() {
            for (what, path) in [("Inventory", &inventory), ("Playbook", &playbook)] {
                if !settings.resolve(path).is_file() {
                    return Err(ZError::missing_file(
                        what,
                        settings.resolve(path),
                        Some("Set it in [deploy] of z.toml or pass it on the command line".into()),
                    )
                    .into());
                }
            }
        }
        ctx.require_tool("ansible-playbook", "deploying")?;

        let cmd = ansible_command(&PlaybookRun {
            inventory: &inventory,
            playbook: &playbook,
            limit: self.limit.as_deref(),
            tags: &self.tags,
            check: self.check,
            extra: &self.extra,
        });
        ctx.shell.run(&cmd, Output::Inherit)?;

        if !ctx.dry_run() {
            let mode = if self.check { " (check mode)" } else { "" };
            print_success(&format!("deployed with {}{}", playbook.display(), mode));
        }
        Ok(())
    }
}
