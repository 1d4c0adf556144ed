//! Core utilities: configuration, errors, logging, process execution,
//! feedback throttling and the health server

pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod process;
pub mod web_server;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use feedback::{FeedbackError, FeedbackOutcome, FeedbackThrottle};
pub use logging::{init_logger, log_startup_configuration};
