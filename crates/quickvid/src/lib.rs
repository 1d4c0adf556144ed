//! QuickVid - Telegram bot that downloads a video link in the chosen quality
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, process execution, feedback throttle, health server
//! - `download`: quality tokens, external tools, artifacts and the download pipeline
//! - `storage`: SQLite pool, migrations and the feedback store
//! - `telegram`: bot setup, dispatcher schema, event routing and delivery
//! - `cli`: command line interface

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod core;
pub mod download;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult, Config};
pub use download::{DownloadPipeline, DownloadRequest, Quality};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
