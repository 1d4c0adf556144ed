//! Download pipeline orchestrator.
//!
//! One invocation per quality selection:
//!   acquire → reconcile/validate → compress if over the ceiling → deliver → cleanup
//!
//! Every failure ends in exactly one user-visible message and a
//! [`PipelineOutcome::Failed`]; nothing propagates to the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::Display;

use crate::core::config::{delivery, Config};
use crate::download::artifact;
use crate::download::error::DownloadError;
use crate::download::quality::{DeliveryMode, DownloadRequest};
use crate::download::send::{Attachment, OutboundSink};
use crate::download::tools::MediaTools;

const MSG_DOWNLOAD_FAILED: &str = "❌ Failed to download. Please try another link.";
const MSG_ARTIFACT_MISSING: &str = "❌ Video file not found. Merging might have failed.";
const MSG_DELIVERY_FAILED: &str = "❌ Error sending file. Please try again.";

fn starting_message(request: &DownloadRequest) -> String {
    format!("⏳ Downloading your {} file, please wait...", request.quality)
}

/// States a single request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PipelineState {
    Requested,
    Acquiring,
    Validating,
    Compressing,
    Delivering,
    Cleanup,
    Done,
    Failed,
}

/// Terminal result of one pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// `path` is the file that was sent; `compressed` tells whether it is the
    /// transcoded sibling. Both are already deleted.
    Delivered { path: PathBuf, compressed: bool },
    /// `state` is the state the request was in when it failed.
    Failed { state: PipelineState, error: DownloadError },
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PipelineOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Transient artifact directory, created on demand
    pub output_dir: PathBuf,
    /// Artifacts above this size (MB) are compressed before delivery
    pub max_delivery_mb: f64,
    pub compress_bitrate: String,
}

impl PipelineSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_delivery_mb: delivery::MAX_SIZE_MB,
            compress_bitrate: delivery::COMPRESS_VIDEO_BITRATE.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.download_folder.clone())
    }
}

/// Drives [`MediaTools`] and an [`OutboundSink`] for one request at a time.
///
/// Cheap to clone; concurrent runs share nothing but the output directory.
#[derive(Clone)]
pub struct DownloadPipeline {
    tools: Arc<dyn MediaTools>,
    sink: Arc<dyn OutboundSink>,
    settings: PipelineSettings,
}

impl DownloadPipeline {
    pub fn new(tools: Arc<dyn MediaTools>, sink: Arc<dyn OutboundSink>, settings: PipelineSettings) -> Self {
        Self { tools, sink, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the request with the current time as artifact timestamp.
    pub async fn run(&self, request: DownloadRequest) -> PipelineOutcome {
        self.run_at(request, chrono::Utc::now().timestamp()).await
    }

    /// Run the request with an explicit artifact timestamp (unix seconds).
    pub async fn run_at(&self, request: DownloadRequest, unix_ts: i64) -> PipelineOutcome {
        let chat_id = request.chat_id;
        let outcome = self.execute(&request, unix_ts).await;
        match &outcome {
            PipelineOutcome::Delivered { path, compressed } => {
                log::info!(
                    "Pipeline[{}]: {} ({} {}, compressed={})",
                    chat_id,
                    PipelineState::Done,
                    request.quality,
                    path.display(),
                    compressed
                );
            }
            PipelineOutcome::Failed { state, error } => {
                log::error!(
                    "Pipeline[{}]: {} in {} [{}]: {}",
                    chat_id,
                    PipelineState::Failed,
                    state,
                    error.subcategory(),
                    error
                );
            }
        }
        outcome
    }

    async fn execute(&self, request: &DownloadRequest, unix_ts: i64) -> PipelineOutcome {
        let chat_id = request.chat_id;

        // ── Step 1: Requested ──
        self.enter(chat_id, PipelineState::Requested);
        self.notify(chat_id, &starting_message(request)).await;

        if let Err(e) = fs_err::tokio::create_dir_all(&self.settings.output_dir).await {
            return self
                .fail(
                    chat_id,
                    PipelineState::Requested,
                    DownloadError::DownloadFailed(e.to_string()),
                    MSG_DOWNLOAD_FAILED,
                )
                .await;
        }
        let output = artifact::artifact_path(&self.settings.output_dir, chat_id, unix_ts, request.quality.extension());

        // ── Step 2: Acquiring ──
        self.enter(chat_id, PipelineState::Acquiring);
        if let Err(e) = self
            .tools
            .download(&request.url, request.quality.format_selector(), &output)
            .await
        {
            artifact::cleanup_partial(&output).await;
            return self.fail(chat_id, PipelineState::Acquiring, e, MSG_DOWNLOAD_FAILED).await;
        }

        // ── Step 3: Validating ──
        self.enter(chat_id, PipelineState::Validating);
        let output = artifact::reconcile_extension(&output).await;
        let size_mb = match artifact::size_mb(&output).await {
            Ok(size) => size,
            Err(e) => {
                log::debug!("Pipeline[{}]: stat {} failed: {}", chat_id, output.display(), e);
                artifact::cleanup_partial(&output).await;
                return self
                    .fail(
                        chat_id,
                        PipelineState::Validating,
                        DownloadError::ArtifactMissing(output),
                        MSG_ARTIFACT_MISSING,
                    )
                    .await;
            }
        };
        log::info!("Pipeline[{}]: artifact {} is {:.2} MB", chat_id, output.display(), size_mb);

        // ── Step 4: Compressing (only above the ceiling) ──
        let compressed = if size_mb > self.settings.max_delivery_mb {
            self.enter(chat_id, PipelineState::Compressing);
            self.compress(chat_id, &output).await
        } else {
            None
        };

        // ── Step 5: Delivering ──
        self.enter(chat_id, PipelineState::Delivering);
        let sent = compressed.clone().unwrap_or_else(|| output.clone());
        let attachment = match request.quality.delivery_mode() {
            DeliveryMode::Audio => Attachment::Audio(sent.clone()),
            DeliveryMode::Document => Attachment::Document(sent.clone()),
        };
        let delivery = self.sink.send_attachment(chat_id, &attachment).await;

        // ── Step 6: Cleanup (after any delivery attempt) ──
        self.enter(chat_id, PipelineState::Cleanup);
        self.remove_artifacts(&output, compressed.as_deref()).await;

        match delivery {
            Ok(()) => PipelineOutcome::Delivered {
                path: sent,
                compressed: compressed.is_some(),
            },
            Err(e) => {
                self.fail(
                    chat_id,
                    PipelineState::Delivering,
                    DownloadError::DeliveryFailed(e.to_string()),
                    MSG_DELIVERY_FAILED,
                )
                .await
            }
        }
    }

    /// Transcode `original` into its compressed sibling.
    ///
    /// Returns the sibling path on success. On failure the original is delivered
    /// instead and whatever the transcoder left behind is removed.
    async fn compress(&self, chat_id: i64, original: &Path) -> Option<PathBuf> {
        let target = artifact::compressed_path(original);
        let result = self
            .tools
            .transcode(original, &target, &self.settings.compress_bitrate)
            .await;

        match result {
            Ok(()) if artifact::exists(&target).await => {
                log::info!("Pipeline[{}]: compressed into {}", chat_id, target.display());
                Some(target)
            }
            Ok(()) => {
                log::warn!(
                    "Pipeline[{}]: transcoder reported success but {} is missing, sending original",
                    chat_id,
                    target.display()
                );
                None
            }
            Err(e) => {
                log::warn!("Pipeline[{}]: [{}] {}, sending original", chat_id, e.subcategory(), e);
                if let Err(e) = artifact::remove(&target).await {
                    log::warn!("Pipeline[{}]: {}", chat_id, e);
                }
                None
            }
        }
    }

    async fn remove_artifacts(&self, original: &Path, compressed: Option<&Path>) {
        for path in std::iter::once(original).chain(compressed) {
            if let Err(e) = artifact::remove(path).await {
                log::warn!("[{}] {}", e.subcategory(), e);
            }
        }
    }

    fn enter(&self, chat_id: i64, state: PipelineState) {
        log::info!("Pipeline[{}]: → {}", chat_id, state);
    }

    /// Send a status line; a failed status message never aborts the request.
    async fn notify(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.sink.send_text(chat_id, text).await {
            log::warn!("Pipeline[{}]: failed to send status message: {}", chat_id, e);
        }
    }

    async fn fail(&self, chat_id: i64, state: PipelineState, error: DownloadError, message: &str) -> PipelineOutcome {
        self.notify(chat_id, message).await;
        PipelineOutcome::Failed { state, error }
    }
}
