//! Test doubles for the storage and transcoding collaborators.

use crate::config::settings::AppConfig;
use crate::infrastructure::storage::publisher::OutputPublisher;
use crate::infrastructure::storage::{ObjectStore, PutReceipt, SourceLocator, StorageError};
use crate::infrastructure::webhook::client::WebhookNotifier;
use crate::modules::job::pipeline::JobPipeline;
use crate::state::AppState;
use crate::workers::transcoder::{TranscodeError, Transcoder};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn test_config(staging_dir: &Path) -> AppConfig {
    AppConfig {
        server_port: 0,
        input_bucket: "input-bucket".to_string(),
        output_bucket: "output-bucket".to_string(),
        region: "us-east-1".to_string(),
        endpoint_url: None,
        access_key: String::new(),
        secret_key: String::new(),
        ffmpeg_path: "ffmpeg".to_string(),
        staging_dir: staging_dir.to_path_buf(),
    }
}

pub fn test_state(
    staging_dir: &Path,
    locator: Arc<MockLocator>,
    transcoder: Arc<MockTranscoder>,
    store: Arc<MockStore>,
) -> AppState {
    let config = test_config(staging_dir);
    let pipeline = JobPipeline::new(
        transcoder,
        OutputPublisher::new(store, config.output_bucket.clone()),
        WebhookNotifier::default(),
        config.staging_dir.clone(),
    );
    AppState::new(config, locator, pipeline)
}

pub fn staging_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

#[derive(Default)]
pub struct MockLocator {
    fail: bool,
    calls: Mutex<Vec<(String, String, u64)>>,
}

impl MockLocator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String, u64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceLocator for MockLocator {
    async fn resolve_readable_reference(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), ttl.as_secs()));

        if self.fail {
            return Err(StorageError::Presign {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "credentials rejected".to_string(),
            });
        }
        Ok(format!("https://signed.example/{bucket}/{key}"))
    }
}

pub struct MockTranscoder {
    failure: Option<String>,
    delay: Duration,
    inputs: Mutex<Vec<String>>,
    outputs: Mutex<Vec<PathBuf>>,
}

impl MockTranscoder {
    pub const OUTPUT: &'static [u8] = b"ID3 fake mp3";

    pub fn succeeding() -> Self {
        Self {
            failure: None,
            delay: Duration::ZERO,
            inputs: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
        }
    }

    /// Leaves a partial file behind, like an engine dying mid-write.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(&self, input: &str, output: &Path) -> Result<(), TranscodeError> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.outputs.lock().unwrap().push(output.to_path_buf());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.failure {
            Some(message) => {
                let _ = tokio::fs::write(output, b"partial").await;
                Err(TranscodeError::Engine(message.clone()))
            }
            None => {
                tokio::fs::write(output, Self::OUTPUT)
                    .await
                    .map_err(|e| TranscodeError::Engine(e.to_string()))?;
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreBehavior {
    Accept,
    NoIndicator,
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct PutCall {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
}

pub struct MockStore {
    behavior: StoreBehavior,
    puts: Mutex<Vec<PutCall>>,
}

impl MockStore {
    pub fn new(behavior: StoreBehavior) -> Self {
        Self {
            behavior,
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<PutReceipt, StorageError> {
        self.puts.lock().unwrap().push(PutCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
        });

        match &self.behavior {
            StoreBehavior::Accept => Ok(PutReceipt { success: true }),
            StoreBehavior::NoIndicator => Ok(PutReceipt { success: false }),
            StoreBehavior::Fail(message) => Err(StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: message.clone(),
            }),
        }
    }
}
