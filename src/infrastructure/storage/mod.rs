use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub mod publisher;
pub mod s3;

/// Validity window of the readable reference handed to the transcoder.
pub const SOURCE_REFERENCE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid presigning window: {0}")]
    PresignConfig(String),
    #[error("failed to presign {bucket}/{key}: {message}")]
    Presign {
        bucket: String,
        key: String,
        message: String,
    },
    #[error("failed to upload {bucket}/{key}: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
}

/// What the destination store reported for a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutReceipt {
    pub success: bool,
}

#[async_trait]
pub trait SourceLocator: Send + Sync {
    /// Returns a URL the transcoding engine can read the object from until
    /// `ttl` elapses.
    async fn resolve_readable_reference(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<PutReceipt, StorageError>;
}
