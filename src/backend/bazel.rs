//! Bazel backend
//!
//! Module names are resolved through the [`ModuleTable`](crate::modules::ModuleTable)
//! before they reach bazel. Install has no bazel counterpart, so it copies the
//! built binaries out of `bazel-bin/`.

use anyhow::{bail, Result};

use super::{BackendContext, BackendKind, BuildBackend, BuildMode};
use crate::exec::{quote, ShellCommand};
use crate::utils::terminal::print_warning;

/// Drives `bazel` with a shared disk cache
#[derive(Debug, Default)]
pub struct BazelBackend;

/// Split `//pkg/path:name` into (`pkg/path`, `name`).
///
/// A label without `:name` names the target after its last package segment.
/// Patterns (`...`, `:all`, `*`) and external labels have no single output.
pub fn label_output(label: &str) -> Option<(String, String)> {
    let rest = label.strip_prefix("//")?;
    let (package, name) = match rest.split_once(':') {
        Some((package, name)) => (package, name),
        None => (rest, rest.rsplit('/').next().unwrap_or(rest)),
    };

    if name.is_empty()
        || package.contains("...")
        || matches!(name, "all" | "*" | "all-targets")
    {
        return None;
    }

    Some((package.to_string(), name.to_string()))
}

impl BazelBackend {
    pub fn new() -> Self {
        Self
    }

    fn targets(ctx: &BackendContext, rest: &[String]) -> Result<Vec<String>> {
        ctx.modules.targets_for(rest, print_warning)
    }

    fn disk_cache_flag(ctx: &BackendContext) -> String {
        format!("--disk_cache={}", ctx.cache_dir.display())
    }

    fn build_command(ctx: &BackendContext, targets: &[String]) -> ShellCommand {
        let mut args = vec![
            "build".to_string(),
            "-s".to_string(),
            "--verbose_failures".to_string(),
            Self::disk_cache_flag(ctx),
        ];
        args.extend(targets.iter().cloned());
        ShellCommand::from_parts("bazel", args).echoed()
    }

    /// Targets an install copies: the named ones, or every module.
    ///
    /// After a build the names were already checked and warned about, so
    /// unknown ones are dropped silently.
    fn install_targets(ctx: &BackendContext, rest: &[String], built: bool) -> Result<Vec<String>> {
        if rest.is_empty() {
            return Ok(ctx.modules.iter().map(|m| m.target.clone()).collect());
        }
        if built {
            return Ok(ctx.modules.resolve(rest).targets);
        }
        Self::targets(ctx, rest)
    }
}

impl BuildBackend for BazelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Bazel
    }

    fn tool(&self) -> &'static str {
        "bazel"
    }

    fn configure(
        &self,
        _ctx: &BackendContext,
        _clean: bool,
        _mode: BuildMode,
    ) -> Result<Vec<ShellCommand>> {
        print_warning("config is not supported by the bazel backend");
        Ok(Vec::new())
    }

    fn build(&self, ctx: &BackendContext, rest: &[String]) -> Result<Vec<ShellCommand>> {
        let targets = Self::targets(ctx, rest)?;
        Ok(vec![Self::build_command(ctx, &targets)])
    }

    fn install(
        &self,
        ctx: &BackendContext,
        rest: &[String],
        built: bool,
    ) -> Result<Vec<ShellCommand>> {
        let mut outputs = Vec::new();
        let mut buildable = Vec::new();
        for target in Self::install_targets(ctx, rest, built)? {
            match label_output(&target) {
                Some(output) => {
                    outputs.push(output);
                    buildable.push(target);
                }
                None => print_warning(&format!(
                    "Cannot install {}: not a single local target",
                    target
                )),
            }
        }

        if outputs.is_empty() {
            bail!("Nothing to install: name one or more modules, e.g. `z install deva`");
        }

        let bin_dir = ctx.output_dir.join("bin");
        let mut plan = Vec::new();
        if !built {
            plan.push(Self::build_command(ctx, &buildable));
        }
        plan.push(ShellCommand::new(format!("mkdir -p {}", bin_dir.display())));
        for (package, name) in outputs {
            plan.push(ShellCommand::new(format!(
                "cp -f bazel-bin/{}/{} {}",
                package,
                name,
                bin_dir.join(&name).display()
            )));
        }
        Ok(plan)
    }

    fn test(
        &self,
        ctx: &BackendContext,
        rest: &[String],
        filter: Option<&str>,
    ) -> Result<Vec<ShellCommand>> {
        let mut args = vec![
            "test".to_string(),
            "--test_output=errors".to_string(),
            Self::disk_cache_flag(ctx),
        ];
        if let Some(filter) = filter {
            args.push(format!("--test_filter={}", quote(filter)));
        }
        args.extend(Self::targets(ctx, rest)?);
        Ok(vec![ShellCommand::from_parts("bazel", args).echoed()])
    }
}
