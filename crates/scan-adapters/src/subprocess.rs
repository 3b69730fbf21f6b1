//! Shared subprocess-execution helper. Every adapter below spawns exactly
//! one external tool, bounds it with a timeout, and truncates captured
//! stderr for diagnostics.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;

const STDERR_TRUNCATE_BYTES: usize = 4096;

/// Outcome of running one subprocess to completion (or timeout).
pub struct SubprocessOutput {
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub timed_out: bool,
}

impl SubprocessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

fn truncate_stderr(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if text.len() > STDERR_TRUNCATE_BYTES {
        let mut boundary = STDERR_TRUNCATE_BYTES;
        while !text.is_char_boundary(boundary) {
            boundary -= 1;
        }
        format!("{}… (truncated)", &text[..boundary])
    } else {
        text.into_owned()
    }
}

/// Runs `command` to completion, killing it if `timeout` elapses.
pub async fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<SubprocessOutput> {
    command
        .kill_on_drop(true)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());
    let child = command.spawn().context("spawning analyzer subprocess")?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(SubprocessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: truncate_stderr(&output.stderr),
            timed_out: false,
        }),
        Ok(Err(err)) => Err(err).context("waiting for analyzer subprocess"),
        Err(_) => {
            tracing::warn!(?timeout, "analyzer subprocess timed out, killing");
            Ok(SubprocessOutput {
                exit_code: None,
                stdout: Vec::new(),
                stderr: "subprocess timed out".to_string(),
                timed_out: true,
            })
        }
    }
}
