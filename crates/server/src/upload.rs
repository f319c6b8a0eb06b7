use std::path::{Path, PathBuf};

use pose_stream_core::shared::constants::VIDEO_EXTENSIONS;
use uuid::Uuid;

const FALLBACK_NAME: &str = "upload";

/// Reduces a client-supplied file name to a safe single path component.
///
/// Only the last component survives, every character outside
/// `[A-Za-z0-9._-]` becomes `_`, and `..` runs are collapsed so the result
/// can never name a parent directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "_");
    }

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path an upload is stored at: `<dir>/<session id>_<sanitized name>`.
pub fn upload_path(dir: &Path, id: Uuid, client_name: &str) -> PathBuf {
    dir.join(format!("{id}_{}", sanitize_filename(client_name)))
}

/// Whether the name carries one of the usual video container extensions.
pub fn has_video_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Writes an upload to disk, creating the upload directory when missing.
pub async fn save_upload(
    dir: &Path,
    id: Uuid,
    client_name: &str,
    data: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = upload_path(dir, id, client_name);
    tokio::fs::write(&path, data).await?;
    Ok(path)
}
