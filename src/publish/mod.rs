//! Publish boundary for locally-held media artifacts
//!
//! Handlers that download media into the request scratch dir cannot hand a
//! local path to the caller. The publisher converts such artifacts, exactly
//! once per item, into an externally-referenceable handle. Backed by the
//! object_store crate so the same code serves in-memory (tests), local
//! filesystem, and remote stores.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mime::Mime;
use object_store::{ObjectStore, path::Path as StorePath};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to read artifact: {0}")]
    Read(#[from] std::io::Error),

    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),
}

/// Capability to turn a local artifact into a fetchable handle.
#[async_trait]
pub trait MediaPublisher: Send + Sync {
    /// Upload the file at `path` and return its external handle.
    async fn publish(&self, path: &Path, mime: &Mime) -> Result<String, PublishError>;
}

/// Publisher over any object_store backend.
#[derive(Clone)]
pub struct StorePublisher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base_url: Option<String>,
}

impl StorePublisher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            store,
            bucket,
            public_base_url,
        }
    }

    /// In-memory publisher for tests and development.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(object_store::memory::InMemory::new()),
            "delinkify-local".to_string(),
            None,
        )
    }

    /// Publisher writing under a local filesystem root.
    pub fn local(root: &Path, public_base_url: Option<String>) -> Result<Self, PublishError> {
        std::fs::create_dir_all(root)?;
        let store = object_store::local::LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(
            Arc::new(store),
            root.display().to_string(),
            public_base_url,
        ))
    }

    fn handle_for(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("object://{}/{}", self.bucket, key),
        }
    }
}

#[async_trait]
impl MediaPublisher for StorePublisher {
    async fn publish(&self, path: &Path, mime: &Mime) -> Result<String, PublishError> {
        let data = tokio::fs::read(path).await?;
        let size = data.len();

        let key = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("media/{}.{}", Uuid::new_v4(), ext),
            None => format!("media/{}", Uuid::new_v4()),
        };

        self.store.put(&StorePath::from(key.as_str()), data.into()).await?;
        tracing::info!(key, size, mime = %mime, "published media artifact");

        Ok(self.handle_for(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publishes_artifact_and_returns_handle() {
        let publisher = StorePublisher::in_memory();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        tokio::fs::write(&file, b"not really a video").await.unwrap();

        let mime: Mime = "video/mp4".parse().unwrap();
        let handle = publisher.publish(&file, &mime).await.unwrap();
        assert!(handle.starts_with("object://delinkify-local/media/"));
        assert!(handle.ends_with(".mp4"));

        let key = handle
            .strip_prefix("object://delinkify-local/")
            .unwrap();
        let stored = publisher
            .store
            .get(&StorePath::from(key))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(&stored[..], b"not really a video");
    }

    #[tokio::test]
    async fn uses_public_base_url_when_configured() {
        let publisher = StorePublisher::new(
            Arc::new(object_store::memory::InMemory::new()),
            "bucket".to_string(),
            Some("https://media.example.com/".to_string()),
        );
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pic.jpg");
        tokio::fs::write(&file, b"jpeg bytes").await.unwrap();

        let mime: Mime = "image/jpeg".parse().unwrap();
        let handle = publisher.publish(&file, &mime).await.unwrap();
        assert!(handle.starts_with("https://media.example.com/media/"));
    }

    #[tokio::test]
    async fn missing_artifact_is_a_read_error() {
        let publisher = StorePublisher::in_memory();
        let mime: Mime = "image/jpeg".parse().unwrap();
        let err = publisher
            .publish(Path::new("/nonexistent/pic.jpg"), &mime)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Read(_)));
    }
}
