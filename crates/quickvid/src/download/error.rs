use std::path::PathBuf;
use thiserror::Error;

/// Failures of one quality-selection request.
///
/// Every variant is handled where it happens; none escapes the pipeline
/// invocation that produced it.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Callback payload could not be decoded (logged, event dropped)
    #[error("malformed callback token {0}")]
    MalformedToken(String),

    /// yt-dlp exited non-zero, could not start, or timed out
    #[error("download failed: {0}")]
    DownloadFailed(String),

    /// Nothing at the expected path after the download tool finished
    #[error("artifact missing at {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// ffmpeg failed; the caller falls back to the original artifact
    #[error("transcode failed: {0}")]
    TranscodeFailed(String),

    /// The transport refused the attachment
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    /// An artifact could not be removed (logged only)
    #[error("cleanup of {} failed: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::MalformedToken(_) => "malformed_token",
            DownloadError::DownloadFailed(_) => "download_failed",
            DownloadError::ArtifactMissing(_) => "artifact_missing",
            DownloadError::TranscodeFailed(_) => "transcode_failed",
            DownloadError::DeliveryFailed(_) => "delivery_failed",
            DownloadError::CleanupFailed { .. } => "cleanup_failed",
        }
    }
}
