//! Runtime configuration.
//!
//! Values are read once at startup into a [`Config`] that is passed explicitly to
//! everything that needs it. Fixed protocol constants live in the nested modules.

use log::LevelFilter;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::error::{AppError, AppResult};

/// Delivery limits and compression parameters
pub mod delivery {
    /// Largest artifact (in MB) the transport accepts as an attachment
    pub const MAX_SIZE_MB: f64 = 50.0;

    /// Video bitrate used when an artifact has to be shrunk
    pub const COMPRESS_VIDEO_BITRATE: &str = "800k";

    /// Encoder preset for the compression pass
    pub const COMPRESS_PRESET: &str = "fast";
}

/// Feedback throttling
pub mod feedback {
    /// One submission per chat within this many days
    pub const WINDOW_DAYS: i64 = 7;
}

/// Callback payload format
pub mod callback {
    /// Prefix of quality-selection callback payloads
    pub const QUALITY_PREFIX: &str = "quality_";

    /// Separator between the quality tag and the URL
    pub const DELIMITER: char = '_';

    /// Telegram rejects inline buttons whose callback data exceeds 64 bytes
    pub const MAX_DATA_BYTES: usize = 64;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds).
    /// Large uploads go through the same client, hence the generous value.
    pub const REQUEST_TIMEOUT_SECS: u64 = 600;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Service configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Version string reported by the health endpoint
    pub version: String,
    pub service_name: String,
    pub service_host: String,
    pub port: u16,
    /// Bot token; `None` is fine for offline commands such as `download`
    pub bot_token: Option<SecretString>,
    /// Custom Bot API server (local telegram-bot-api)
    pub bot_api_url: Option<Url>,
    pub database_path: String,
    pub log_file_path: String,
    pub log_level: LevelFilter,
    /// Transient artifact directory
    pub download_folder: PathBuf,
    pub ytdl_bin: String,
    pub ffmpeg_bin: String,
    /// Upper bound for a single external tool run; `None` waits forever
    pub tool_timeout: Option<Duration>,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env loaded: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .or_else(|| get("TELOXIDE_TOKEN"))
            .map(SecretString::from);

        let bot_api_url = match get("BOT_API_URL") {
            Some(raw) => Some(Url::parse(&raw).map_err(|e| AppError::config("BOT_API_URL", e.to_string()))?),
            None => None,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config("PORT", format!("'{}': {}", raw, e)))?,
            None => 8080,
        };

        let log_level = match get("LOG_LEVEL") {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| AppError::config("LOG_LEVEL", format!("unknown level '{}'", raw)))?,
            None => LevelFilter::Info,
        };

        let tool_timeout = match get("TOOL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| AppError::config("TOOL_TIMEOUT_SECS", format!("'{}': {}", raw, e)))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            version: get("VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            service_name: get("SERVICE_NAME").unwrap_or_else(|| "quickvid".to_string()),
            service_host: get("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            bot_token,
            bot_api_url,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "database.sqlite".to_string()),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| "app.log".to_string()),
            log_level,
            download_folder: PathBuf::from(get("DOWNLOAD_FOLDER").unwrap_or_else(|| "downloads".to_string())),
            ytdl_bin: get("YTDL_BIN").unwrap_or_else(|| "yt-dlp".to_string()),
            ffmpeg_bin: get("FFMPEG_BIN").unwrap_or_else(|| "ffmpeg".to_string()),
            tool_timeout,
        })
    }

    /// The bot token, or a config error naming the expected variable.
    pub fn require_bot_token(&self) -> AppResult<&SecretString> {
        self.bot_token
            .as_ref()
            .ok_or_else(|| AppError::config("TELEGRAM_BOT_TOKEN", "not specified"))
    }

    /// Address the health server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.port)
    }
}
