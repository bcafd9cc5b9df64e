//! Detection of the external tools z drives

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use serde::Serialize;
use which::which;

use crate::error::{hints, ZError};

/// Every external program some subcommand may shell out to
pub const KNOWN_TOOLS: &[&str] = &[
    "xmake",
    "bazel",
    "clang-format",
    "clang-tidy",
    "git",
    "ansible-playbook",
];

/// Tool detection result
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// First line of `tool --version`, if the tool reports one
    pub version: Option<String>,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    let path = which(tool_name).ok()?;
    Some(ToolInfo {
        name: tool_name.to_string(),
        version: get_tool_version(&path),
        path,
    })
}

/// Get tool version by running `tool --version`
fn get_tool_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Require a tool to exist on PATH, return error with hint if missing
pub fn require_tool(tool_name: &str, required_for: &str) -> Result<PathBuf> {
    which(tool_name).map_err(|_| {
        ZError::missing_tool(tool_name, required_for, get_tool_hint(tool_name)).into()
    })
}

/// Get installation hint for a tool
pub fn get_tool_hint(tool_name: &str) -> &'static str {
    match tool_name {
        "xmake" => hints::xmake(),
        "bazel" | "bazelisk" => hints::bazel(),
        "clang-format" => hints::clang_format(),
        "clang-tidy" => hints::clang_tidy(),
        "git" => hints::git(),
        "ansible-playbook" | "ansible" => hints::ansible(),
        _ => "Install this tool and ensure it's in your PATH",
    }
}

/// Check multiple tools and return results
pub fn check_tools(tool_names: &[&str]) -> Vec<(String, Option<ToolInfo>)> {
    tool_names
        .iter()
        .map(|name| (name.to_string(), check_tool(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_common_tools() {
        // sh is the one program every supported host has
        let results = check_tools(&["sh"]);
        assert_eq!(results.len(), 1);
        assert!(results[0].1.is_some());
    }

    #[test]
    fn test_missing_tool_error() {
        let err = require_tool("z-definitely-not-installed", "testing").unwrap_err();
        let z_err = err.downcast_ref::<ZError>().unwrap();
        assert!(matches!(z_err, ZError::MissingTool { .. }));
    }

    #[test]
    fn test_known_tools_have_hints() {
        for tool in KNOWN_TOOLS {
            assert_ne!(
                get_tool_hint(tool),
                "Install this tool and ensure it's in your PATH",
                "{tool} has no hint"
            );
        }
    }
}
