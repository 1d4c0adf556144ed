//! One feedback message per chat per rolling week.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::feedback::WINDOW_DAYS;
use crate::core::error::AppError;
use crate::storage::feedback::{FeedbackRecord, FeedbackStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Stored
    Accepted,
    /// A record newer than the window exists; nothing was written
    Throttled { last_submitted: DateTime<Utc> },
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback text is empty")]
    EmptyText,

    #[error("failed to store feedback: {0}")]
    Store(#[source] AppError),
}

/// Rate limiter in front of a [`FeedbackStore`].
#[derive(Clone)]
pub struct FeedbackThrottle {
    store: Arc<dyn FeedbackStore>,
    window: Duration,
}

impl FeedbackThrottle {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self {
            store,
            window: Duration::days(WINDOW_DAYS),
        }
    }

    pub async fn submit(&self, chat_id: i64, text: &str) -> Result<FeedbackOutcome, FeedbackError> {
        self.submit_at(chat_id, text, Utc::now()).await
    }

    /// Same as [`submit`](Self::submit) with an explicit clock.
    pub async fn submit_at(
        &self,
        chat_id: i64,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<FeedbackOutcome, FeedbackError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FeedbackError::EmptyText);
        }

        let previous = match self.store.latest_for_chat(chat_id).await {
            Ok(previous) => previous,
            Err(e) => {
                log::warn!("Feedback lookup for chat {} failed, treating as first submission: {}", chat_id, e);
                None
            }
        };

        if let Some(previous) = previous {
            if previous.created_at > now - self.window {
                log::info!("Feedback from chat {} throttled (last at {})", chat_id, previous.created_at);
                return Ok(FeedbackOutcome::Throttled {
                    last_submitted: previous.created_at,
                });
            }
        }

        let record = FeedbackRecord {
            chat_id,
            message: text.to_string(),
            created_at: now,
        };
        self.store.insert(&record).await.map_err(FeedbackError::Store)?;
        log::info!("Feedback saved for chat {} ({} chars)", chat_id, text.chars().count());

        Ok(FeedbackOutcome::Accepted)
    }
}
