//! Dispatcher schema: turns teloxide updates into [`InboundEvent`]s.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::telegram::router::{EventRouter, InboundEvent};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Creates the dispatcher handler tree for the bot.
///
/// Branches only translate updates through [`message_event`] and
/// [`callback_event`]; all routing happens in [`EventRouter`].
pub fn schema(router: Arc<EventRouter>) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(message_handler(router.clone()))
        .branch(callback_handler(router))
}

/// Text messages become [`InboundEvent::Message`]; anything without text is dropped.
pub fn message_event(msg: &Message) -> Option<InboundEvent> {
    msg.text().map(|text| InboundEvent::Message {
        chat_id: msg.chat.id.0,
        text: text.to_string(),
    })
}

/// Callbacks need both the originating chat and a payload.
pub fn callback_event(q: &CallbackQuery) -> Option<InboundEvent> {
    let chat_id = q.message.as_ref()?.chat().id;
    let data = q.data.clone()?;
    Some(InboundEvent::Callback {
        chat_id: chat_id.0,
        data,
    })
}

fn message_handler(router: Arc<EventRouter>) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| message_event(&msg))
        .endpoint(move |event: InboundEvent| {
            let router = router.clone();
            async move { router.handle(event).await.map_err(|e| Box::new(e) as HandlerError) }
        })
}

fn callback_handler(router: Arc<EventRouter>) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let router = router.clone();
        async move {
            // Stop the button spinner before a potentially long download
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query: {}", e);
            }

            let Some(event) = callback_event(&q) else {
                log::warn!("Callback {:?} without message or data, ignoring", q.id);
                return Ok::<(), HandlerError>(());
            };

            router.handle(event).await.map_err(|e| Box::new(e) as HandlerError)
        }
    })
}

/// Run the long-polling dispatcher until Ctrl-C.
///
/// Updates of one chat are handled in order; different chats run concurrently.
pub async fn run_dispatcher(bot: Bot, router: Arc<EventRouter>) {
    Dispatcher::builder(bot, schema(router))
        .enable_ctrlc_handler()
        .error_handler(LoggingErrorHandler::with_custom_text("An error from the update handler"))
        .build()
        .dispatch()
        .await;
}
