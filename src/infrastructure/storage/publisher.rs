use super::{ObjectStore, StorageError};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to read output file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StorageError),
    #[error("upload of {key} was not acknowledged by the store")]
    NotAcknowledged { key: String },
}

/// Moves a finished local file into the destination bucket.
#[derive(Clone)]
pub struct OutputPublisher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl OutputPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub async fn publish(&self, local_path: &Path, key: &str) -> Result<(), PublishError> {
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|source| PublishError::Read {
                path: local_path.to_path_buf(),
                source,
            })?;
        let size = data.len();

        let receipt = self.store.put(&self.bucket, key, Bytes::from(data)).await?;
        if !receipt.success {
            return Err(PublishError::NotAcknowledged {
                key: key.to_string(),
            });
        }

        info!(bucket = %self.bucket, key, bytes = size, "⬆️ Uploaded output");
        Ok(())
    }
}
