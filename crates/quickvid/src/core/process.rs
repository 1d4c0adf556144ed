//! Process execution utilities with optional timeout
//!
//! External tools (yt-dlp, ffmpeg) write their own progress to the service's
//! stdout/stderr; callers only care about the exit status.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The binary could not be started (missing, not executable)
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process outlived its deadline and was killed
    #[error("{program} timed out after {secs}s", secs = .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}

/// Run a command to completion and return its exit status.
///
/// stdin is closed so a tool can never block on an interactive prompt; stdout and
/// stderr are inherited. With `timeout = None` the call waits as long as the tool
/// runs. On timeout the child is killed (via `kill_on_drop`).
pub async fn run_status(cmd: &mut Command, timeout: Option<Duration>) -> Result<ExitStatus, ProcessError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    let waited = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill timed out {}: {}", program, e);
                }
                return Err(ProcessError::Timeout { program, timeout: limit });
            }
        },
        None => child.wait().await,
    };

    waited.map_err(|source| ProcessError::Spawn { program, source })
}

/// Check whether a binary is runnable by asking it for its version.
pub async fn probe(program: &str, version_flag: &str) -> bool {
    Command::new(program)
        .arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_status_is_reported() {
        let ok = run_status(&mut Command::new("true"), None).await.unwrap();
        assert!(ok.success());

        let failed = run_status(&mut Command::new("false"), None).await.unwrap();
        assert!(!failed.success());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = run_status(&mut Command::new("/nonexistent/quickvid-tool"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let err = run_status(&mut cmd, Some(Duration::from_millis(100))).await.unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_probe() {
        assert!(!probe("/nonexistent/quickvid-tool", "--version").await);
    }
}
