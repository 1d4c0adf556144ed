use thiserror::Error;

/// Centralized infrastructure error type.
///
/// Pipeline-level failures have their own taxonomy in
/// [`crate::download::error::DownloadError`]; this enum covers everything the
/// pipeline and router sit on top of (storage, transport, config, IO).
///
/// # Example
///
/// ```no_run
/// use quickvid::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Missing or malformed configuration value
    #[error("Config error ({key}): {message}")]
    Config { key: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

impl AppError {
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        AppError::Config {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AppError::config("PORT", "not a number");
        assert_eq!(err.to_string(), "Config error (PORT): not a number");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
