//! ImageSlot - Latest-Image Storage
//!
//! ## Responsibilities
//!
//! - Hold at most one image at a fixed path inside the upload directory
//! - Replace it atomically on every accepted upload (write temp, then rename)
//! - Serve the full current content to query and delivery operations
//!
//! The atomic replace is what lets concurrent readers race a store safely:
//! a reader sees either the old or the new content in full, never a torn
//! mixture. Bytes are never validated as an actual image.

use crate::error::{Error, Result};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// Fixed name of the stored image file
const SLOT_FILE: &str = "latest.png";

/// ImageSlot instance
pub struct ImageSlot {
    /// Directory holding the slot file and temp files
    upload_dir: PathBuf,
    /// Path of the slot file itself
    path: PathBuf,
    /// Advisory filename from the most recent upload
    filename: RwLock<Option<String>>,
}

impl ImageSlot {
    /// Create new ImageSlot rooted at `upload_dir`, creating it if needed
    pub async fn new(upload_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&upload_dir).await?;
        let path = upload_dir.join(SLOT_FILE);
        Ok(Self {
            upload_dir,
            path,
            filename: RwLock::new(None),
        })
    }

    /// Replace the slot content with `bytes`, remembering the advisory filename
    ///
    /// Writes to a uniquely named temp file and renames it over the slot
    /// file. A failure at any point leaves the previous content intact.
    pub async fn store(&self, bytes: &[u8], filename: &str) -> Result<()> {
        let tmp = self
            .upload_dir
            .join(format!(".upload-{}.tmp", uuid::Uuid::new_v4()));

        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            // Rename failed, don't leave the temp file behind
            let _ = fs::remove_file(&tmp).await;
            return Err(Error::Io(e));
        }

        *self.filename.write().await = Some(filename.to_string());

        tracing::debug!(
            filename = %filename,
            size = bytes.len(),
            path = %self.path.display(),
            "Stored image in slot"
        );

        Ok(())
    }

    /// True iff a stored image is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Full current content of the slot
    pub async fn read(&self) -> Result<Vec<u8>> {
        if !self.exists() {
            return Err(Error::NotFound("No image available".to_string()));
        }
        Ok(fs::read(&self.path).await?)
    }

    /// Advisory filename of the most recent upload, `latest.png` by default
    pub async fn filename(&self) -> String {
        self.filename
            .read()
            .await
            .clone()
            .unwrap_or_else(|| SLOT_FILE.to_string())
    }
}
