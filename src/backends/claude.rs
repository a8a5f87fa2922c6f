// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Headless invocation of the claude CLI.
//!
//! Transformers that declare the language-model effect go through this one
//! entry point. The CLI runs in print mode with session persistence and
//! setting sources disabled, so a run never picks up implicit user or
//! project state. The child is spawned with kill-on-drop, which releases
//! the subprocess on every exit path, including timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::TransformerError;

/// Default ceiling for one model invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Run the claude CLI with the given prompt on stdin and return its
/// response text.
///
/// `allowed_tools` whitelists tools for the invocation; an empty list
/// disables tools entirely, which is what text-only generation wants.
/// `mcp_config` optionally points at an MCP server configuration file.
pub async fn run_claude(
    prompt: &str,
    allowed_tools: &[&str],
    mcp_config: Option<&Path>,
    timeout: Duration,
) -> Result<String, TransformerError> {
    let mut cmd = Command::new("claude");
    cmd.arg("--print")
        .arg("--dangerously-skip-permissions")
        .arg("--no-session-persistence")
        .arg("--setting-sources")
        .arg("");

    if let Some(path) = mcp_config {
        cmd.arg("--mcp-config").arg(path);
    }

    if allowed_tools.is_empty() {
        cmd.arg("--tools").arg("");
    } else {
        cmd.arg("--allowedTools").arg(allowed_tools.join(","));
    }

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| TransformerError::Claude(format!("failed to spawn claude CLI: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(prompt.as_bytes()).await?;
        // Dropping stdin closes the pipe and lets the CLI read EOF.
    }

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => return Err(TransformerError::Timeout(timeout)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("claude exited with {}", output.status)
        } else {
            stderr
        };
        return Err(TransformerError::Claude(detail));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
