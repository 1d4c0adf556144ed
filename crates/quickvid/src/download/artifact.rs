//! Artifact naming, container reconciliation, size probing and removal.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::download::error::DownloadError;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Suffixes yt-dlp leaves next to an interrupted or unmerged output
const PARTIAL_SUFFIXES: [&str; 3] = [".part", ".webm", ".ytdl"];

/// `dir/<chat_id>_<unix_ts>.<ext>`
///
/// Two requests from the same chat within one second map to the same path.
pub fn artifact_path(dir: &Path, chat_id: i64, unix_ts: i64, extension: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", chat_id, unix_ts, extension))
}

/// Sibling path for the compressed copy: `stem_compressed.ext`.
pub fn compressed_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_compressed.{}", stem, ext.to_string_lossy()),
        None => format!("{}_compressed", stem),
    };
    path.with_file_name(name)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Move `expected + ".webm"` onto `expected` when the tool wrote that instead.
///
/// The container is not changed, only the name. Returns the path the artifact is
/// expected at afterwards (always `expected`).
pub async fn reconcile_extension(expected: &Path) -> PathBuf {
    let merged = with_suffix(expected, ".webm");
    if exists(&merged).await {
        match fs_err::tokio::rename(&merged, expected).await {
            Ok(()) => log::info!("Renamed {} -> {}", merged.display(), expected.display()),
            Err(e) => log::warn!("Failed to reconcile extension: {}", e),
        }
    }
    expected.to_path_buf()
}

pub async fn exists(path: &Path) -> bool {
    fs_err::tokio::metadata(path).await.is_ok()
}

/// File size in MiB (the unit the 50 MB ceiling is expressed in).
pub async fn size_mb(path: &Path) -> std::io::Result<f64> {
    let meta = fs_err::tokio::metadata(path).await?;
    Ok(meta.len() as f64 / BYTES_PER_MB)
}

/// Delete an artifact. A file that is already gone counts as removed.
pub async fn remove(path: &Path) -> Result<(), DownloadError> {
    match fs_err::tokio::remove_file(path).await {
        Ok(()) => {
            log::info!("🗑️ Deleted {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(DownloadError::CleanupFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Best-effort sweep of tool leftovers around `expected` after a failed acquisition.
pub async fn cleanup_partial(expected: &Path) {
    let leftovers = PARTIAL_SUFFIXES.iter().map(|s| with_suffix(expected, s));
    for candidate in std::iter::once(expected.to_path_buf()).chain(leftovers) {
        if let Err(e) = remove(&candidate).await {
            log::warn!("{}", e);
        }
    }
}
