//! Event classification and dispatch.
//!
//! [`classify`] is transport-independent and pure; [`EventRouter`] carries the
//! collaborators each route needs and runs the matching handler.

use std::sync::Arc;

use crate::core::config::callback::QUALITY_PREFIX;
use crate::core::error::AppResult;
use crate::core::feedback::{FeedbackError, FeedbackOutcome, FeedbackThrottle};
use crate::download::pipeline::DownloadPipeline;
use crate::download::quality::DownloadRequest;
use crate::download::send::OutboundSink;
use crate::telegram::commands;

/// Inbound event, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message { chat_id: i64, text: String },
    Callback { chat_id: i64, data: String },
}

impl InboundEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::Message { chat_id, .. } | InboundEvent::Callback { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    Help,
    About,
    /// Feedback text after the command, possibly empty
    Feedback(String),
    /// The "Download Video" keyboard button
    DownloadHint,
    Url(String),
    /// Raw quality callback token
    Quality(String),
    Unknown,
    Ignored,
}

const FEEDBACK_COMMAND: &str = "/feedback";

/// Decide what an event asks for.
///
/// Exact commands first, then the feedback prefix, then URL schemes; anything
/// else is unknown. Callbacks without the quality prefix are ignored.
pub fn classify(event: &InboundEvent) -> Route {
    match event {
        InboundEvent::Callback { data, .. } => {
            if data.starts_with(QUALITY_PREFIX) {
                Route::Quality(data.clone())
            } else {
                Route::Ignored
            }
        }
        InboundEvent::Message { text, .. } => classify_text(text),
    }
}

fn classify_text(text: &str) -> Route {
    let text = text.trim();
    match text {
        "" => return Route::Ignored,
        "/start" => return Route::Start,
        "/help" => return Route::Help,
        "/about" => return Route::About,
        commands::DOWNLOAD_BUTTON => return Route::DownloadHint,
        _ => {}
    }

    if let Some(rest) = text.strip_prefix(FEEDBACK_COMMAND) {
        // "/feedbackfoo" is not the feedback command
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Route::Feedback(rest.trim().to_string());
        }
    }

    if text.starts_with("http://") || text.starts_with("https://") {
        return Route::Url(text.to_string());
    }

    Route::Unknown
}

/// Owns the per-route collaborators. Shared across all chats.
#[derive(Clone)]
pub struct EventRouter {
    sink: Arc<dyn OutboundSink>,
    pipeline: DownloadPipeline,
    feedback: FeedbackThrottle,
}

impl EventRouter {
    pub fn new(sink: Arc<dyn OutboundSink>, pipeline: DownloadPipeline, feedback: FeedbackThrottle) -> Self {
        Self {
            sink,
            pipeline,
            feedback,
        }
    }

    /// Handle one event to completion.
    ///
    /// Quality callbacks run the whole pipeline before returning. Errors are
    /// transport failures of the reply itself.
    pub async fn handle(&self, event: InboundEvent) -> AppResult<()> {
        let chat_id = event.chat_id();
        let route = classify(&event);
        log::debug!("Chat {}: {:?}", chat_id, route);

        match route {
            Route::Start => {
                self.sink
                    .send_menu(chat_id, commands::WELCOME_TEXT, commands::main_menu())
                    .await
            }
            Route::Help => self.sink.send_markdown(chat_id, &commands::help_text()).await,
            Route::About => self.sink.send_markdown(chat_id, &commands::about_text()).await,
            Route::Feedback(text) => self.handle_feedback(chat_id, &text).await,
            Route::DownloadHint => self.sink.send_text(chat_id, commands::DOWNLOAD_HINT_TEXT).await,
            Route::Url(url) => self.offer_qualities(chat_id, &url).await,
            Route::Quality(token) => {
                self.run_download(chat_id, &token).await;
                Ok(())
            }
            Route::Unknown => self.sink.send_text(chat_id, commands::UNKNOWN_COMMAND_TEXT).await,
            Route::Ignored => Ok(()),
        }
    }

    async fn handle_feedback(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let reply = match self.feedback.submit(chat_id, text).await {
            Ok(FeedbackOutcome::Accepted) => commands::FEEDBACK_THANKS_TEXT,
            Ok(FeedbackOutcome::Throttled { .. }) => commands::FEEDBACK_THROTTLED_TEXT,
            Err(FeedbackError::EmptyText) => commands::FEEDBACK_USAGE_TEXT,
            Err(e @ FeedbackError::Store(_)) => {
                log::error!("Chat {}: {}", chat_id, e);
                commands::FEEDBACK_FAILED_TEXT
            }
        };
        self.sink.send_text(chat_id, reply).await
    }

    async fn offer_qualities(&self, chat_id: i64, url: &str) -> AppResult<()> {
        let Some(menu) = commands::quality_menu(url) else {
            log::warn!("Chat {}: URL too long for callback data ({} bytes)", chat_id, url.len());
            return self.sink.send_text(chat_id, commands::LINK_TOO_LONG_TEXT).await;
        };

        self.sink.send_text(chat_id, commands::QUALITY_INTRO_TEXT).await?;
        self.sink.send_menu(chat_id, commands::QUALITY_PROMPT_TEXT, menu).await
    }

    async fn run_download(&self, chat_id: i64, token: &str) {
        let request = match DownloadRequest::from_token(chat_id, token) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Chat {}: dropping callback [{}]: {}", chat_id, e.subcategory(), e);
                return;
            }
        };
        log::info!("Chat {}: selected {} for {}", chat_id, request.quality, request.url);
        self.pipeline.run(request).await;
    }
}
