//! Outbound side of the bot: everything the pipeline and router send to a chat.
//!
//! [`OutboundSink`] hides the transport. The Telegram implementation lives in
//! `telegram::sink`; [`LocalSink`] serves the one-shot CLI download.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::error::{AppError, AppResult};

/// A file handed to the transport, tagged with how it should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Audio(PathBuf),
    /// Generic file; the transport does not re-process documents
    Document(PathBuf),
}

impl Attachment {
    pub fn path(&self) -> &Path {
        match self {
            Attachment::Audio(path) | Attachment::Document(path) => path,
        }
    }
}

/// Keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    /// Buttons that send `(label, callback data)` back as a callback event
    Inline(Vec<Vec<(String, String)>>),
    /// Persistent reply keyboard; pressing a button sends its label as text
    Reply(Vec<Vec<String>>),
}

#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()>;

    /// `text` must already be valid for the transport's markdown dialect.
    async fn send_markdown(&self, chat_id: i64, text: &str) -> AppResult<()>;

    async fn send_menu(&self, chat_id: i64, text: &str, menu: Menu) -> AppResult<()>;

    async fn send_attachment(&self, chat_id: i64, attachment: &Attachment) -> AppResult<()>;
}

/// Sink for running the pipeline outside of Telegram.
///
/// Messages go to stdout; attachments are copied into `target_dir` before the
/// pipeline deletes its artifacts.
#[derive(Debug, Clone)]
pub struct LocalSink {
    target_dir: PathBuf,
}

impl LocalSink {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }
}

#[async_trait]
impl OutboundSink for LocalSink {
    async fn send_text(&self, _chat_id: i64, text: &str) -> AppResult<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.send_text(chat_id, text).await
    }

    async fn send_menu(&self, chat_id: i64, text: &str, _menu: Menu) -> AppResult<()> {
        self.send_text(chat_id, text).await
    }

    async fn send_attachment(&self, _chat_id: i64, attachment: &Attachment) -> AppResult<()> {
        let source = attachment.path();
        let file_name = source
            .file_name()
            .ok_or_else(|| AppError::Validation(format!("attachment has no file name: {}", source.display())))?;
        fs_err::tokio::create_dir_all(&self.target_dir).await?;
        let target = self.target_dir.join(file_name);

        // The pipeline deletes `source` after delivery; copying onto itself would lose it
        let source_real = fs_err::tokio::canonicalize(source).await?;
        let target_real = fs_err::tokio::canonicalize(&self.target_dir).await?.join(file_name);
        if source_real == target_real {
            return Err(AppError::Validation(format!(
                "target {} is the artifact itself; choose an output directory outside the download folder",
                target.display()
            )));
        }

        fs_err::tokio::copy(source, &target).await?;
        println!("📂 Saved {}", target.display());
        Ok(())
    }
}
