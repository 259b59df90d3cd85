//! Image upload storage.
//!
//! An upload is streamed into a hidden `.part` file while size and type limits are
//! enforced, renamed into place on success, and handed back as a [`PendingUpload`].
//! The pending upload deletes its file when dropped unless the owning record was
//! persisted and [`PendingUpload::commit`] was called.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Default upload cap: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Public path prefix under which stored images are referenced.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Allowed extensions and the MIME types accepted for them.
const ALLOWED_IMAGE_TYPES: &[(&str, &[&str])] = &[
    ("jpg", &["image/jpeg", "image/jpg", "image/pjpeg"]),
    ("jpeg", &["image/jpeg", "image/jpg", "image/pjpeg"]),
    ("png", &["image/png"]),
    ("gif", &["image/gif"]),
    ("webp", &["image/webp"]),
];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Image exceeds the maximum upload size of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Only image files are allowed (jpeg, jpg, png, gif, webp); got '{filename}' ({content_type})")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },
    #[error("Uploaded image is empty")]
    Empty,
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Rejections caused by the client's file, as opposed to server-side IO failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Io(_))
    }
}

pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks the declared file type and opens a writer for the upload body.
    pub async fn begin(&self, filename: &str, content_type: Option<&str>) -> Result<UploadWriter, UploadError> {
        let extension = allowed_extension(filename, content_type)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let stored_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple(),
            extension
        );
        let final_path = self.dir.join(&stored_name);
        let part_path = self.dir.join(format!(".{}.part", stored_name));
        let file = tokio::fs::File::create(&part_path).await?;

        Ok(UploadWriter {
            file: Some(file),
            part_path,
            final_path,
            stored_name,
            written: 0,
            max_bytes: self.max_bytes,
        })
    }

    /// Stores an upload held fully in memory.
    pub async fn store_bytes(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<PendingUpload, UploadError> {
        let mut writer = self.begin(filename, content_type).await?;
        writer.write_chunk(bytes).await?;
        writer.finish().await
    }
}

fn allowed_extension(filename: &str, content_type: Option<&str>) -> Result<String, UploadError> {
    let rejected = || UploadError::UnsupportedType {
        filename: filename.to_string(),
        content_type: content_type.unwrap_or("unknown").to_string(),
    };
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(rejected)?;
    let mime = content_type
        .and_then(|c| c.split(';').next())
        .map(|c| c.trim().to_ascii_lowercase())
        .ok_or_else(rejected)?;

    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(ext, mimes)| *ext == extension && mimes.contains(&mime.as_str()))
        .map(|(ext, _)| ext.to_string())
        .ok_or_else(rejected)
}

/// Streams one upload to disk. Dropping it before [`UploadWriter::finish`] removes the partial file.
pub struct UploadWriter {
    file: Option<tokio::fs::File>,
    part_path: PathBuf,
    final_path: PathBuf,
    stored_name: String,
    written: usize,
    max_bytes: usize,
}

impl UploadWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        self.written += chunk.len();
        if self.written > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        match self.file.as_mut() {
            Some(file) => file.write_all(chunk).await?,
            None => return Err(UploadError::Io(std::io::Error::new(ErrorKind::Other, "upload already finished"))),
        }
        Ok(())
    }

    pub async fn finish(mut self) -> Result<PendingUpload, UploadError> {
        if self.written == 0 {
            return Err(UploadError::Empty);
        }
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        tokio::fs::rename(&self.part_path, &self.final_path).await?;
        debug!(path = %self.final_path.display(), bytes = self.written, "Upload stored");
        Ok(PendingUpload {
            path: self.final_path.clone(),
            reference: format!("{}/{}", UPLOAD_URL_PREFIX, self.stored_name),
            committed: false,
        })
    }
}

impl Drop for UploadWriter {
    fn drop(&mut self) {
        // After `finish` the part file has been renamed away; NotFound is expected then.
        self.file.take();
        remove_quietly(&self.part_path);
    }
}

/// A stored image not yet referenced by any persisted record.
#[derive(Debug)]
pub struct PendingUpload {
    path: PathBuf,
    reference: String,
    committed: bool,
}

impl PendingUpload {
    /// Public reference stored in `imageRef`, e.g. `/uploads/1700000000000-<uuid>.png`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the file. Call only once the record referencing it is persisted.
    pub fn commit(mut self) -> String {
        self.committed = true;
        std::mem::take(&mut self.reference)
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.committed {
            debug!(path = %self.path.display(), "Discarding uncommitted upload");
            remove_quietly(&self.path);
        }
    }
}

// Runs from `Drop`, so it cannot await. A single unlink is short enough to block on.
fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove upload file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n0000";

    fn files_in(dir: &Path) -> Vec<String> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn committed_upload_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"), 1024);

        let pending = store
            .store_bytes("Rex.PNG", Some("image/png"), PNG_HEADER)
            .await
            .unwrap();
        let path = pending.path().to_path_buf();
        assert!(pending.reference().starts_with("/uploads/"));
        assert!(pending.reference().ends_with(".png"));

        let reference = pending.commit();
        assert!(path.exists());
        assert_eq!(files_in(&store.dir()), vec![reference.trim_start_matches("/uploads/").to_string()]);
    }

    #[tokio::test]
    async fn dropped_upload_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);
        let pending = store
            .store_bytes("cat.jpg", Some("image/jpeg"), b"jpegdata")
            .await
            .unwrap();
        let path = pending.path().to_path_buf();
        drop(pending);
        assert!(!path.exists());
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_and_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 8);

        let mut writer = store.begin("big.gif", Some("image/gif")).await.unwrap();
        writer.write_chunk(b"GIF89a").await.unwrap();
        let err = writer.write_chunk(b"more bytes").await.unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit: 8 }));
        assert!(err.is_client_error());
        drop(writer);
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn type_allow_list_checks_extension_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);

        for (name, mime) in [
            ("notes.txt", Some("text/plain")),
            ("photo.png", Some("application/pdf")),
            ("photo.exe", Some("image/png")),
            ("photo", Some("image/png")),
            ("photo.png", None),
        ] {
            let err = store.begin(name, mime).await.err().unwrap();
            assert!(matches!(err, UploadError::UnsupportedType { .. }), "{} {:?}", name, mime);
        }
        assert!(store.begin("pic.webp", Some("image/webp; charset=binary")).await.is_ok());
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);
        let err = store.store_bytes("a.png", Some("image/png"), b"").await.unwrap_err();
        assert!(matches!(err, UploadError::Empty));
        assert!(files_in(dir.path()).is_empty());
    }
}
