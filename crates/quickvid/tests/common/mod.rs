//! Common test utilities
//!
//! In-memory stand-ins for the external tools, the outbound transport and the
//! feedback store, shared across all integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use quickvid::core::error::{AppError, AppResult};
use quickvid::download::{Attachment, DownloadError, DownloadPipeline, MediaTools, Menu, OutboundSink, PipelineSettings};
use quickvid::storage::{FeedbackRecord, FeedbackStore};

/// What the fake download tool does with its output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadBehavior {
    /// Write `bytes` to the requested path
    Write { bytes: usize },
    /// Write `bytes` to `<path>.webm` instead
    WriteWebm { bytes: usize },
    /// Exit successfully without producing anything
    WriteNothing,
    /// Leave a `.part` file and fail
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeBehavior {
    Write { bytes: usize },
    /// Leave a truncated output and fail
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCall {
    pub url: String,
    pub format_selector: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bitrate: String,
}

pub struct FakeTools {
    download: DownloadBehavior,
    transcode: TranscodeBehavior,
    pub downloads: Mutex<Vec<DownloadCall>>,
    pub transcodes: Mutex<Vec<TranscodeCall>>,
}

impl FakeTools {
    pub fn new(download: DownloadBehavior, transcode: TranscodeBehavior) -> Arc<Self> {
        Arc::new(Self {
            download,
            transcode,
            downloads: Mutex::new(Vec::new()),
            transcodes: Mutex::new(Vec::new()),
        })
    }

    pub fn downloads(&self) -> Vec<DownloadCall> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn transcodes(&self) -> Vec<TranscodeCall> {
        self.transcodes.lock().unwrap().clone()
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[async_trait]
impl MediaTools for FakeTools {
    async fn download(&self, url: &str, format_selector: &str, output: &Path) -> Result<(), DownloadError> {
        self.downloads.lock().unwrap().push(DownloadCall {
            url: url.to_string(),
            format_selector: format_selector.to_string(),
            output: output.to_path_buf(),
        });

        match self.download {
            DownloadBehavior::Write { bytes } => std::fs::write(output, vec![0u8; bytes]).unwrap(),
            DownloadBehavior::WriteWebm { bytes } => std::fs::write(sibling(output, ".webm"), vec![0u8; bytes]).unwrap(),
            DownloadBehavior::WriteNothing => {}
            DownloadBehavior::Fail => {
                std::fs::write(sibling(output, ".part"), b"partial").unwrap();
                return Err(DownloadError::DownloadFailed("yt-dlp exited with exit status: 1".into()));
            }
        }
        Ok(())
    }

    async fn transcode(&self, input: &Path, output: &Path, video_bitrate: &str) -> Result<(), DownloadError> {
        self.transcodes.lock().unwrap().push(TranscodeCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            bitrate: video_bitrate.to_string(),
        });

        match self.transcode {
            TranscodeBehavior::Write { bytes } => {
                std::fs::write(output, vec![0u8; bytes]).unwrap();
                Ok(())
            }
            TranscodeBehavior::Fail => {
                std::fs::write(output, b"trunc").unwrap();
                Err(DownloadError::TranscodeFailed("ffmpeg exited with exit status: 1".into()))
            }
        }
    }
}

/// Everything a sink was asked to send, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(i64, String),
    Markdown(i64, String),
    Menu(i64, String, Menu),
    /// The attachment plus whether its file existed when it was sent
    Attachment(i64, Attachment, bool),
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<Sent>>,
    fail_attachments: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A sink whose attachment uploads always fail.
    pub fn failing_attachments() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_attachments: true,
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(_, text) | Sent::Markdown(_, text) | Sent::Menu(_, text, _) => Some(text),
                Sent::Attachment(..) => None,
            })
            .collect()
    }

    pub fn attachments(&self) -> Vec<(Attachment, bool)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Attachment(_, attachment, existed) => Some((attachment, existed)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl OutboundSink for RecordingSink {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Text(chat_id, text.to_string()));
        Ok(())
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Markdown(chat_id, text.to_string()));
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, menu: Menu) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Menu(chat_id, text.to_string(), menu));
        Ok(())
    }

    async fn send_attachment(&self, chat_id: i64, attachment: &Attachment) -> AppResult<()> {
        let existed = attachment.path().exists();
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Attachment(chat_id, attachment.clone(), existed));
        if self.fail_attachments {
            return Err(AppError::Validation("Request Entity Too Large".into()));
        }
        Ok(())
    }
}

/// Feedback records kept in memory; counts lookups.
#[derive(Default)]
pub struct MemoryFeedbackStore {
    pub records: Mutex<Vec<FeedbackRecord>>,
    pub lookups: Mutex<usize>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_records(records: Vec<FeedbackRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            lookups: Mutex::new(0),
        })
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn latest_for_chat(&self, chat_id: i64) -> AppResult<Option<FeedbackRecord>> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.chat_id == chat_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn insert(&self, record: &FeedbackRecord) -> AppResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Pipeline settings with a 1 KiB ceiling so tests never write large files.
pub fn small_ceiling_settings(dir: &Path) -> PipelineSettings {
    PipelineSettings {
        output_dir: dir.to_path_buf(),
        max_delivery_mb: 1.0 / 1024.0,
        compress_bitrate: "800k".to_string(),
    }
}

pub fn pipeline(tools: Arc<FakeTools>, sink: Arc<RecordingSink>, dir: &Path) -> DownloadPipeline {
    DownloadPipeline::new(tools, sink, small_ceiling_settings(dir))
}

/// Files left in `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
