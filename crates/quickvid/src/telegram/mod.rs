//! Telegram bot integration: bot setup, dispatcher schema, routing and delivery

pub mod bot;
pub mod commands;
pub mod router;
pub mod schema;
pub mod sink;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands};
pub use router::{classify, EventRouter, InboundEvent, Route};
pub use schema::{run_dispatcher, schema, HandlerError};
pub use sink::TelegramSink;
