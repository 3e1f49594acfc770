//! Media storage seam.
//!
//! Listing photos are blobs behind an opaque id; items only store those
//! ids. The trait keeps handlers independent of where bytes live. The
//! bundled implementation writes to a local directory that a reverse
//! proxy serves; swapping in an object store is a matter of one new
//! impl.
//!
//! | Variable | Default | Purpose |
//! |-------------------------|------------|---------------------------------|
//! | `MEDIA_ROOT` | `./media` | Directory uploaded files land in |
//! | `MEDIA_PUBLIC_BASE_URL` | `/media` | Public URL prefix for blobs |

use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("invalid media id")]
    InvalidId,
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Handed to a client that wants to upload: PUT the bytes to
/// `upload_url`, then reference `media_id` when creating the listing.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    pub media_id: String,
    pub upload_url: String,
    pub public_url: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Mints a fresh media id for an upload of the given content type.
    fn issue_upload(&self, content_type: &str) -> Result<UploadTicket, MediaError>;

    fn public_url(&self, media_id: &str) -> String;

    async fn store(&self, media_id: &str, bytes: Bytes) -> Result<(), MediaError>;

    /// Removes a blob. Deleting an id that is already gone is not an
    /// error; item deletion retries must stay idempotent.
    async fn delete(&self, media_id: &str) -> Result<(), MediaError>;
}

const EXTENSIONS: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        LocalMediaStore {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
        let public_base =
            std::env::var("MEDIA_PUBLIC_BASE_URL").unwrap_or_else(|_| "/media".to_string());
        LocalMediaStore::new(PathBuf::from(root), public_base)
    }

    /// Media ids are generated as `<32 hex>.<ext>`; anything else is
    /// rejected before it can touch the filesystem.
    fn checked_path(&self, media_id: &str) -> Result<PathBuf, MediaError> {
        let (stem, ext) = media_id.split_once('.').ok_or(MediaError::InvalidId)?;
        let stem_ok = stem.len() == 32 && stem.bytes().all(|b| b.is_ascii_hexdigit());
        let ext_ok = EXTENSIONS.iter().any(|(_, e)| *e == ext);
        if !stem_ok || !ext_ok {
            return Err(MediaError::InvalidId);
        }
        Ok(self.root.join(media_id))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn issue_upload(&self, content_type: &str) -> Result<UploadTicket, MediaError> {
        let extension = EXTENSIONS
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| MediaError::UnsupportedType(content_type.to_string()))?;
        let media_id = format!("{}.{extension}", Uuid::new_v4().simple());
        Ok(UploadTicket {
            upload_url: format!("/api/v1/media/{media_id}"),
            public_url: self.public_url(&media_id),
            media_id,
        })
    }

    fn public_url(&self, media_id: &str) -> String {
        format!("{}/{media_id}", self.public_base_url)
    }

    async fn store(&self, media_id: &str, bytes: Bytes) -> Result<(), MediaError> {
        let path = self.checked_path(media_id)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn delete(&self, media_id: &str) -> Result<(), MediaError> {
        let path = self.checked_path(media_id)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
