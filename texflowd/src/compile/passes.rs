//! External toolchain invocation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::error;

/// Captured result of one toolchain invocation. Never persisted beyond the
/// request.
#[derive(Debug, Clone)]
pub struct PassResult {
    /// Exit code (0 = success; -1 when killed by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl PassResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Full log text surfaced to callers on failure.
    pub fn aggregated_log(&self) -> String {
        format!("{}\n\nErrors:\n{}", self.stdout, self.stderr)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("invocation exceeded its {}s budget", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run one external invocation inside `dir`, bounded by `budget`.
///
/// stdout/stderr are piped and drained concurrently by `wait_with_output`,
/// so a chatty child never blocks on a full pipe. On timeout the wait future
/// is dropped and `kill_on_drop` reaps the child.
pub async fn run_pass(
    program: &str,
    args: &[&str],
    dir: &Path,
    budget: Duration,
) -> Result<PassResult, PassError> {
    let child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            error!(program, "failed to spawn toolchain process: {e}");
            e
        })?;

    let output = tokio::time::timeout(budget, child.wait_with_output())
        .await
        .map_err(|_| PassError::Timeout(budget))??;

    Ok(PassResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Whether the auxiliary file produced by the first render pass requests
/// bibliography resolution.
pub fn needs_bibliography(aux: &str) -> bool {
    aux.contains(r"\bibdata")
}
