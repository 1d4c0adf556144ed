//! External tool runner: yt-dlp for acquisition, ffmpeg for compression.
//!
//! Both calls block the caller until the child process exits. Neither retries.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::core::config::{delivery, Config};
use crate::core::process::{self, ProcessError};
use crate::download::error::DownloadError;

/// Seam between the pipeline and the media tools it drives.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Fetch `url` with the given yt-dlp format expression into `output`.
    async fn download(&self, url: &str, format_selector: &str, output: &Path) -> Result<(), DownloadError>;

    /// Re-encode `input` into `output` at `video_bitrate` (e.g. `"800k"`).
    async fn transcode(&self, input: &Path, output: &Path, video_bitrate: &str) -> Result<(), DownloadError>;
}

/// [`MediaTools`] backed by real child processes.
#[derive(Debug, Clone)]
pub struct ProcessTools {
    ytdl_bin: String,
    ffmpeg_bin: String,
    timeout: Option<Duration>,
}

impl ProcessTools {
    pub fn new(ytdl_bin: impl Into<String>, ffmpeg_bin: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            ytdl_bin: ytdl_bin.into(),
            ffmpeg_bin: ffmpeg_bin.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ytdl_bin.clone(), config.ffmpeg_bin.clone(), config.tool_timeout)
    }

    /// Log whether both binaries are runnable. Missing tools are not fatal at
    /// startup; requests will fail with `DownloadFailed` instead.
    pub async fn log_availability(&self) {
        for (bin, flag) in [(&self.ytdl_bin, "--version"), (&self.ffmpeg_bin, "-version")] {
            if process::probe(bin, flag).await {
                log::info!("✅ {} is available", bin);
            } else {
                log::error!("❌ {} is not runnable; downloads will fail", bin);
            }
        }
    }

    fn download_command(&self, url: &str, format_selector: &str, output: &Path) -> Command {
        let mut cmd = Command::new(&self.ytdl_bin);
        cmd.arg("-f").arg(format_selector).arg("-o").arg(output).arg(url);
        cmd
    }

    fn transcode_command(&self, input: &Path, output: &Path, video_bitrate: &str) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-b:v")
            .arg(video_bitrate)
            .arg("-preset")
            .arg(delivery::COMPRESS_PRESET)
            .arg(output);
        cmd
    }
}

fn describe(program: &str, result: Result<std::process::ExitStatus, ProcessError>) -> Result<(), String> {
    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("{} exited with {}", program, status)),
        Err(e) => Err(e.to_string()),
    }
}

#[async_trait]
impl MediaTools for ProcessTools {
    async fn download(&self, url: &str, format_selector: &str, output: &Path) -> Result<(), DownloadError> {
        log::info!("yt-dlp: -f {} -o {} {}", format_selector, output.display(), url);
        let mut cmd = self.download_command(url, format_selector, output);
        let result = process::run_status(&mut cmd, self.timeout).await;
        describe(&self.ytdl_bin, result).map_err(DownloadError::DownloadFailed)
    }

    async fn transcode(&self, input: &Path, output: &Path, video_bitrate: &str) -> Result<(), DownloadError> {
        log::info!(
            "ffmpeg: {} -> {} at {} ({})",
            input.display(),
            output.display(),
            video_bitrate,
            delivery::COMPRESS_PRESET
        );
        let mut cmd = self.transcode_command(input, output, video_bitrate);
        let result = process::run_status(&mut cmd, self.timeout).await;
        describe(&self.ffmpeg_bin, result).map_err(DownloadError::TranscodeFailed)
    }
}
