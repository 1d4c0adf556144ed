//! Quality tiers and the callback token that carries a (quality, URL) pair.
//!
//! Token wire format: `quality_<tag>_<url>`. Only the first delimiter after the
//! tag is significant, so URLs may contain `_` freely; tags never do.

use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::core::config::callback::{DELIMITER, MAX_DATA_BYTES, QUALITY_PREFIX};
use crate::download::error::DownloadError;

/// User-facing quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum Quality {
    #[strum(serialize = "best")]
    Best,
    #[strum(serialize = "1080p")]
    P1080,
    #[strum(serialize = "720p")]
    P720,
    #[strum(serialize = "480p")]
    P480,
    #[strum(serialize = "360p")]
    P360,
    #[strum(serialize = "audio")]
    Audio,
}

/// How a finished artifact is handed to the transport.
///
/// Video goes out as a generic document so the transport does not re-encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Audio,
    Document,
}

impl Quality {
    /// yt-dlp `-f` expression for this tier
    pub fn format_selector(self) -> &'static str {
        match self {
            Quality::Best => "bestvideo+bestaudio/best",
            Quality::P1080 => "bestvideo[height<=1080]+bestaudio/best",
            Quality::P720 => "bestvideo[height<=720]+bestaudio/best",
            Quality::P480 => "bestvideo[height<=480]+bestaudio/best",
            Quality::P360 => "bestvideo[height<=360]+bestaudio/best",
            Quality::Audio => "bestaudio",
        }
    }

    /// Extension of the artifact requested from the download tool
    pub fn extension(self) -> &'static str {
        match self {
            Quality::Audio => "m4a",
            _ => "mp4",
        }
    }

    pub fn delivery_mode(self) -> DeliveryMode {
        match self {
            Quality::Audio => DeliveryMode::Audio,
            _ => DeliveryMode::Document,
        }
    }

    /// Label shown on the selection keyboard
    pub fn button_label(self) -> &'static str {
        match self {
            Quality::Best => "🔹 Best",
            Quality::P1080 => "🔹 1080p",
            Quality::P720 => "🔹 720p",
            Quality::P480 => "🔹 480p",
            Quality::P360 => "🔹 360p",
            Quality::Audio => "🎵 Audio Only",
        }
    }

    pub fn all() -> impl Iterator<Item = Quality> {
        Quality::iter()
    }
}

/// A decoded quality selection, consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub chat_id: i64,
    pub url: String,
    pub quality: Quality,
}

impl DownloadRequest {
    /// Decode a callback token received in `chat_id`.
    pub fn from_token(chat_id: i64, token: &str) -> Result<Self, DownloadError> {
        let (quality, url) = decode(token)?;
        Ok(Self { chat_id, url, quality })
    }
}

/// Build the callback token for a quality button.
pub fn encode(quality: Quality, url: &str) -> String {
    format!("{}{}{}{}", QUALITY_PREFIX, quality, DELIMITER, url)
}

/// Parse a callback token back into its quality and URL.
pub fn decode(token: &str) -> Result<(Quality, String), DownloadError> {
    let malformed = |reason: &str| DownloadError::MalformedToken(format!("{}: {:?}", reason, token));

    let body = token
        .strip_prefix(QUALITY_PREFIX)
        .ok_or_else(|| malformed("missing quality prefix"))?;
    let (tag, url) = body
        .split_once(DELIMITER)
        .ok_or_else(|| malformed("missing URL segment"))?;
    let quality = Quality::from_str(tag).map_err(|_| malformed("unknown quality"))?;
    if url.is_empty() {
        return Err(malformed("empty URL"));
    }

    Ok((quality, url.to_string()))
}

/// Whether the token fits into Telegram's callback data limit.
pub fn fits_callback_limit(token: &str) -> bool {
    token.len() <= MAX_DATA_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_selector_table() {
        assert_eq!(Quality::Best.format_selector(), "bestvideo+bestaudio/best");
        assert_eq!(Quality::P1080.format_selector(), "bestvideo[height<=1080]+bestaudio/best");
        assert_eq!(Quality::P720.format_selector(), "bestvideo[height<=720]+bestaudio/best");
        assert_eq!(Quality::P480.format_selector(), "bestvideo[height<=480]+bestaudio/best");
        assert_eq!(Quality::P360.format_selector(), "bestvideo[height<=360]+bestaudio/best");
        assert_eq!(Quality::Audio.format_selector(), "bestaudio");
    }

    #[test]
    fn test_extension_and_delivery_mode() {
        assert_eq!(Quality::Audio.extension(), "m4a");
        assert_eq!(Quality::Audio.delivery_mode(), DeliveryMode::Audio);
        for q in Quality::all().filter(|q| *q != Quality::Audio) {
            assert_eq!(q.extension(), "mp4");
            assert_eq!(q.delivery_mode(), DeliveryMode::Document);
        }
    }

    #[test]
    fn test_tags_never_contain_delimiter() {
        for q in Quality::all() {
            assert!(!q.to_string().contains(DELIMITER), "tag {} contains delimiter", q);
            assert_eq!(Quality::from_str(q.as_ref()).unwrap(), q);
        }
    }

    #[test]
    fn test_decode_url_with_delimiters() {
        let (quality, url) = decode("quality_720p_https://x.test/v?a=1_2").unwrap();
        assert_eq!(quality, Quality::P720);
        assert_eq!(url, "https://x.test/v?a=1_2");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let urls = [
            "https://youtu.be/abc",
            "https://x.test/a_b_c?d=_e_",
            "https://x.test/__/trailing_",
            "_leading",
        ];
        for q in Quality::all() {
            for url in urls {
                assert_eq!(decode(&encode(q, url)).unwrap(), (q, url.to_string()));
            }
        }
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        for token in ["720p_https://x.test", "quality720p_https://x.test", "", "QUALITY_720p_x"] {
            assert!(
                matches!(decode(token), Err(DownloadError::MalformedToken(_))),
                "accepted {:?}",
                token
            );
        }
    }

    #[test]
    fn test_decode_rejects_incomplete_tokens() {
        assert!(matches!(decode("quality_720p"), Err(DownloadError::MalformedToken(_))));
        assert!(matches!(decode("quality_720p_"), Err(DownloadError::MalformedToken(_))));
        assert!(matches!(decode("quality_4k_https://x.test"), Err(DownloadError::MalformedToken(_))));
    }

    #[test]
    fn test_request_from_token() {
        let request = DownloadRequest::from_token(42, "quality_audio_https://x.test/song").unwrap();
        assert_eq!(
            request,
            DownloadRequest {
                chat_id: 42,
                url: "https://x.test/song".to_string(),
                quality: Quality::Audio,
            }
        );
    }

    #[test]
    fn test_callback_limit() {
        assert!(fits_callback_limit(&encode(Quality::P1080, "https://youtu.be/dQw4w9WgXcQ")));
        let long = format!("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list={}", "x".repeat(40));
        assert!(!fits_callback_limit(&encode(Quality::Best, &long)));
    }
}
