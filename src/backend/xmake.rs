//! xmake backend

use anyhow::Result;

use super::{BackendContext, BackendKind, BuildBackend, BuildMode};
use crate::exec::{quote, ShellCommand};

/// Drives `xmake`; extra arguments are forwarded untouched
#[derive(Debug, Default)]
pub struct XmakeBackend;

impl XmakeBackend {
    pub fn new() -> Self {
        Self
    }

    fn install_command(ctx: &BackendContext, target: Option<&str>) -> ShellCommand {
        let output = ctx.output_dir.display().to_string();
        let mut args = vec!["install", "-o", output.as_str()];
        args.extend(target);
        ShellCommand::from_parts("xmake", args)
    }
}

impl BuildBackend for XmakeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Xmake
    }

    fn tool(&self) -> &'static str {
        "xmake"
    }

    fn configure(
        &self,
        _ctx: &BackendContext,
        clean: bool,
        mode: BuildMode,
    ) -> Result<Vec<ShellCommand>> {
        if clean {
            return Ok(vec![ShellCommand::new("xmake f -c")]);
        }
        Ok(vec![ShellCommand::new(format!("xmake f -cv --mode={}", mode))])
    }

    fn build(&self, _ctx: &BackendContext, rest: &[String]) -> Result<Vec<ShellCommand>> {
        let args = ["b", "-v"].into_iter().map(str::to_string).chain(rest.iter().cloned());
        Ok(vec![ShellCommand::from_parts("xmake", args)])
    }

    fn install(
        &self,
        ctx: &BackendContext,
        rest: &[String],
        built: bool,
    ) -> Result<Vec<ShellCommand>> {
        // after `z build -i`, rest holds xmake build flags rather than targets
        if built || rest.is_empty() {
            return Ok(vec![Self::install_command(ctx, None)]);
        }
        Ok(rest
            .iter()
            .map(|target| Self::install_command(ctx, Some(target.as_str())))
            .collect())
    }

    fn test(
        &self,
        _ctx: &BackendContext,
        rest: &[String],
        filter: Option<&str>,
    ) -> Result<Vec<ShellCommand>> {
        let args = rest.iter().cloned().chain(filter.map(quote));
        Ok(vec![ShellCommand::from_parts("xmake test", args)])
    }
}
