use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Extensions accepted when the content type is missing or not `audio/*`.
const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".m4a", ".webm", ".ogg", ".flac"];

/// Validate an uploaded file by declared content type or filename extension.
///
/// Accepted when the content type starts with `audio/`, or when the
/// filename ends in a known audio extension (case-insensitive). A bare
/// filename with an `audio/*` content type passes; `foo.txt` with neither
/// does not.
pub fn validate_upload(filename: Option<&str>, content_type: Option<&str>) -> Result<()> {
    if content_type.is_some_and(|ct| ct.starts_with("audio/")) {
        return Ok(());
    }

    let has_audio_extension = filename.is_some_and(|name| {
        let name = name.to_lowercase();
        AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    });

    if has_audio_extension {
        Ok(())
    } else {
        Err(Error::InvalidFileType)
    }
}

/// An uploaded file persisted to the upload directory for the lifetime of
/// one request.
///
/// The path is namespaced with a fresh UUID so concurrent uploads sharing
/// a filename cannot collide. Dropping the guard removes the file, on
/// every exit path including recognition failures.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub async fn create(upload_dir: &str, filename: &str, bytes: &[u8]) -> Result<Self> {
        tokio::fs::create_dir_all(upload_dir).await?;

        // Strip any path components from the client-supplied name.
        let base = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let path = Path::new(upload_dir).join(format!("temp_{}_{}", Uuid::new_v4(), base));
        tokio::fs::write(&path, bytes).await?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove temp upload {}: {}", self.path.display(), e);
        }
    }
}
