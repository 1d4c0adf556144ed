//! Logging initialization and startup diagnostics

use anyhow::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

use crate::core::config::Config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (appended to, created if missing)
/// * `level` - Maximum level for both outputs
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file_path, e))?;

    // Quiet the HTTP stack; request-level noise drowns pipeline logs
    let log_config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("h2")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, log_config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, log_config, log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup (secrets excluded).
pub fn log_startup_configuration(config: &Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("{} v{}", config.service_name, config.version);
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("  • Download folder: {}", config.download_folder.display());
    log::info!("  • Database: {}", config.database_path);
    log::info!("  • yt-dlp: {}", config.ytdl_bin);
    log::info!("  • ffmpeg: {}", config.ffmpeg_bin);
    match config.tool_timeout {
        Some(timeout) => log::info!("  • Tool timeout: {}s", timeout.as_secs()),
        None => log::warn!("  • Tool timeout: none (a hung yt-dlp/ffmpeg blocks its chat)"),
    }
    if let Some(ref url) = config.bot_api_url {
        log::info!("  • Bot API URL: {}", url);
    }
    log::info!("  • Health endpoint: http://{}/healthcheck", config.bind_addr());
}
