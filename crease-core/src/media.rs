//! Media storage collaborator interface
//!
//! The entity store holds only durable locators; raw video/photo bytes
//! go through a `MediaStorage` implementation. `LocalMediaStore` writes
//! under the configured media directory; production deployments may
//! substitute an object-store backend behind the same trait.

use crate::Result;
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Blob storage: bytes in, durable locator out.
pub trait MediaStorage: Send + Sync {
    fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Filesystem-backed media storage.
pub struct LocalMediaStore {
    media_dir: PathBuf,
}

impl LocalMediaStore {
    pub fn new(media_dir: PathBuf) -> Self {
        Self { media_dir }
    }
}

impl MediaStorage for LocalMediaStore {
    async fn store(&self, filename: &str, content_type: &str, bytes: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.media_dir).await?;

        // Uuid prefix keeps repeated uploads of the same filename from
        // colliding.
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = self.media_dir.join(&stored_name);
        tokio::fs::write(&path, bytes).await?;

        debug!(
            filename,
            content_type,
            size = bytes.len(),
            "stored media file"
        );
        Ok(path.display().to_string())
    }
}

/// Strip path separators and shell-hostile characters from an uploaded
/// filename before it touches the filesystem.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
