use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::server::config::ServerConfig;

/// Name of the bucket holding flashcard images, both on disk and in public URLs.
pub const BUCKET: &str = "flashcard-images";

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),
    #[error("Image exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
}

/// A decoded `data:image/...;base64,` payload, as produced by the camera or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrlImage {
    pub fn parse(data_url: &str) -> Result<Self, StorageError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| StorageError::InvalidPayload("not a data URL".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| StorageError::InvalidPayload("missing payload".to_string()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| StorageError::InvalidPayload("payload must be base64".to_string()))?;
        if !mime_type.starts_with("image/") {
            return Err(StorageError::InvalidPayload(format!(
                "unsupported media type '{mime_type}'"
            )));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| StorageError::InvalidPayload(format!("bad base64: {e}")))?;
        if bytes.is_empty() {
            return Err(StorageError::InvalidPayload("empty image".to_string()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    /// File extension derived from the MIME subtype, `jpg` when there is none usable.
    pub fn extension(&self) -> String {
        let subtype: String = self
            .mime_type
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or_default()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if subtype.is_empty() {
            DEFAULT_EXTENSION.to_string()
        } else {
            subtype.to_ascii_lowercase()
        }
    }
}

/// Extracts the object path (the segments after the bucket name) from a public image URL.
pub fn path_from_public_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    object_path(&url)
}

fn object_path(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    let bucket_index = segments.iter().position(|s| *s == BUCKET)?;
    let tail = &segments[bucket_index + 1..];
    if tail.is_empty() || tail.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
        return None;
    }
    Some(tail.join("/"))
}

/// Local-filesystem object store for flashcard images.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.image_bucket_dir(),
            &config.public_base_url,
            config.max_image_bytes,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/storage/{}/{}", self.public_base_url, BUCKET, path)
    }

    /// Object path for a URL this storage handed out, `None` for foreign URLs.
    pub fn path_for_url(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let base = Url::parse(&self.public_base_url).ok()?;
        if url.origin() != base.origin() {
            return None;
        }
        object_path(&url)
    }

    /// Like `path_for_url`, but only for objects stored under `owner_id`.
    pub fn owned_path_for_url(&self, owner_id: i32, url: &str) -> Option<String> {
        let path = self.path_for_url(url)?;
        let owner = path.split('/').next()?;
        (owner == owner_id.to_string()).then_some(path)
    }

    /// Stores a data-URL image under `<user_id>/<uuid>.<ext>` and returns its public URL.
    pub async fn upload_data_url(&self, user_id: i32, data_url: &str) -> Result<String, StorageError> {
        let image = DataUrlImage::parse(data_url)?;
        if image.bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let path = format!("{}/{}.{}", user_id, Uuid::new_v4(), image.extension());
        let full_path = self.resolve(&path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, &image.bytes).await?;

        debug!(user_id, path = %path, size = image.bytes.len(), "Stored image.");
        Ok(self.public_url(&path))
    }

    /// Removes an object. A missing object is not an error.
    pub async fn remove(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal of the object behind a public URL; failures are only logged.
    /// Objects outside `owner_id`'s folder are never touched.
    pub async fn remove_by_url(&self, owner_id: i32, url: &str) {
        let Some(path) = self.owned_path_for_url(owner_id, url) else {
            debug!(owner_id, url, "Image URL is not an object of this owner, skipping removal.");
            return;
        };
        if let Err(e) = self.remove(&path).await {
            warn!(path = %path, error = %e, "Failed to remove stored image, continuing.");
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        if path.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_parse_data_url() {
        let image = DataUrlImage::parse(PNG_DATA_URL).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.extension(), "png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_parse_rejects_non_images_and_plain_text() {
        assert!(matches!(
            DataUrlImage::parse("data:text/plain;base64,aGVsbG8="),
            Err(StorageError::InvalidPayload(_))
        ));
        assert!(matches!(
            DataUrlImage::parse("data:image/png,rawbytes"),
            Err(StorageError::InvalidPayload(_))
        ));
        assert!(matches!(
            DataUrlImage::parse("https://example.com/a.png"),
            Err(StorageError::InvalidPayload(_))
        ));
        assert!(matches!(
            DataUrlImage::parse("data:image/png;base64,!!!"),
            Err(StorageError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_extension_fallbacks() {
        let image = |mime: &str| DataUrlImage {
            mime_type: mime.to_string(),
            bytes: vec![1],
        };
        assert_eq!(image("image/jpeg").extension(), "jpeg");
        assert_eq!(image("image/svg+xml").extension(), "svg");
        assert_eq!(image("image/").extension(), "jpg");
    }

    #[test]
    fn test_path_from_public_url() {
        assert_eq!(
            path_from_public_url("http://localhost:8080/storage/flashcard-images/7/abc.png"),
            Some("7/abc.png".to_string())
        );
        assert_eq!(
            path_from_public_url("https://cdn.example.com/x/flashcard-images/7/abc.png?v=2"),
            Some("7/abc.png".to_string())
        );
        assert_eq!(path_from_public_url("/storage/flashcard-images/7/abc.png"), None);
        assert_eq!(path_from_public_url("https://example.com/other/7/abc.png"), None);
        assert_eq!(path_from_public_url("https://example.com/flashcard-images/"), None);
        assert_eq!(
            path_from_public_url("https://example.com/flashcard-images/../secret"),
            None
        );
    }

    #[test]
    fn test_path_for_url_ignores_foreign_hosts() {
        let storage = ImageStorage::new("/tmp/unused", "http://localhost:8080/", 1024);
        assert_eq!(
            storage.path_for_url("http://localhost:8080/storage/flashcard-images/1/a.png"),
            Some("1/a.png".to_string())
        );
        assert_eq!(
            storage.path_for_url("https://elsewhere.example/storage/flashcard-images/1/a.png"),
            None
        );
        assert_eq!(
            storage.path_for_url("http://localhost:8080.evil/storage/flashcard-images/1/a.png"),
            None
        );
        assert_eq!(
            storage.path_for_url("https://localhost:8080/storage/flashcard-images/1/a.png"),
            None
        );
    }

    #[test]
    fn test_owned_path_requires_owner_folder() {
        let storage = ImageStorage::new("/tmp/unused", "http://localhost:8080", 1024);
        let url = "http://localhost:8080/storage/flashcard-images/1/a.png";
        assert_eq!(storage.owned_path_for_url(1, url), Some("1/a.png".to_string()));
        assert_eq!(storage.owned_path_for_url(2, url), None);
        assert_eq!(storage.owned_path_for_url(11, url), None);
    }

    #[tokio::test]
    async fn test_remove_by_url_leaves_other_owners_alone() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path(), "http://localhost:8080", 1024);

        let url = storage.upload_data_url(1, PNG_DATA_URL).await.unwrap();
        let on_disk = dir.path().join(storage.path_for_url(&url).unwrap());

        storage.remove_by_url(2, &url).await;
        assert!(on_disk.exists());

        storage.remove_by_url(1, &url).await;
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_upload_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path(), "http://localhost:8080", 1024);

        let url = storage.upload_data_url(42, PNG_DATA_URL).await.unwrap();
        assert!(url.starts_with("http://localhost:8080/storage/flashcard-images/42/"));
        assert!(url.ends_with(".png"));

        let path = storage.path_for_url(&url).unwrap();
        let on_disk = dir.path().join(&path);
        assert!(on_disk.exists());

        storage.remove(&path).await.unwrap();
        assert!(!on_disk.exists());
        // Removing again is fine.
        storage.remove(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path(), "http://localhost:8080", 8);

        let err = storage.upload_data_url(1, PNG_DATA_URL).await.unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { limit: 8 }));
    }

    #[tokio::test]
    async fn test_remove_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path(), "http://localhost:8080", 1024);
        assert!(matches!(
            storage.remove("../outside.png").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
