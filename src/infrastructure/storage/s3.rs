use super::{ObjectStore, PutReceipt, SourceLocator, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, info};

const OUTPUT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(
        region: &str,
        endpoint: Option<&str>,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            // S3-compatible servers such as MinIO only speak path-style
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(region, endpoint = endpoint.unwrap_or("aws"), "✅ S3 client configured");

        Self { client }
    }
}

#[async_trait]
impl SourceLocator for StorageService {
    async fn resolve_readable_reference(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| StorageError::PresignConfig(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(bucket, key, ttl_secs = ttl.as_secs(), "Presigned input object");
        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<PutReceipt, StorageError> {
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(OUTPUT_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        // A stored object always comes back with an ETag
        Ok(PutReceipt {
            success: output.e_tag().is_some(),
        })
    }
}
