// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Text-to-speech synthesis through the piper CLI.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::TransformerError;

/// Synthesize `text` to a timestamped WAV file under `output_dir`.
///
/// The output directory is created if needed. Returns the path of the
/// generated file.
pub async fn synthesize_with_piper(
    text: &str,
    model_path: &Path,
    output_dir: &Path,
    sentence_silence: f64,
) -> Result<PathBuf, TransformerError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let output_path = output_dir.join(format!("brief_{}.wav", timestamp));

    let mut child = Command::new("piper")
        .arg("--model")
        .arg(model_path)
        .arg("--output_file")
        .arg(&output_path)
        .arg("--sentence_silence")
        .arg(sentence_silence.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| TransformerError::Synthesis(format!("failed to spawn piper: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("piper exited with {}", output.status)
        } else {
            stderr
        };
        return Err(TransformerError::Synthesis(detail));
    }

    Ok(output_path)
}
