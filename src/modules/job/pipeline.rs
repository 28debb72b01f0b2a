use super::error::JobError;
use super::model::{JobOutcome, JobStage, PreparedJob, WebhookPayload};
use crate::common::staging::StagingFile;
use crate::infrastructure::storage::publisher::OutputPublisher;
use crate::infrastructure::webhook::client::WebhookNotifier;
use crate::workers::transcoder::Transcoder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs one job from transcoding through cleanup.
pub struct JobPipeline {
    transcoder: Arc<dyn Transcoder>,
    publisher: OutputPublisher,
    notifier: WebhookNotifier,
    staging_dir: PathBuf,
}

impl JobPipeline {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        publisher: OutputPublisher,
        notifier: WebhookNotifier,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            transcoder,
            publisher,
            notifier,
            staging_dir,
        }
    }

    /// Always returns an outcome. By the time it does, the webhook (if any)
    /// has been attempted and the staging file is gone.
    pub async fn execute(&self, job: PreparedJob) -> JobOutcome {
        let staging = StagingFile::allocate(&self.staging_dir);
        stage(JobStage::Started);

        let started = Instant::now();
        let result = self.convert_and_publish(&job, staging.path()).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(()) => {
                info!(duration_ms, destination = %job.destination, "Job succeeded");
                JobOutcome::Succeeded { duration_ms }
            }
            Err(error) => {
                warn!(duration_ms, %error, "Job failed");
                JobOutcome::Failed { duration_ms, error }
            }
        };

        if job.request.callback_address.is_some() {
            stage(JobStage::Notifying);
        }
        self.notifier
            .notify(
                job.request.callback_address.as_deref(),
                &WebhookPayload::from(&outcome),
            )
            .await
            .log("webhook delivery");

        staging.cleanup().await.log("staging cleanup");
        stage(JobStage::CleanedUp);

        outcome
    }

    async fn convert_and_publish(&self, job: &PreparedJob, local_path: &Path) -> Result<(), JobError> {
        stage(JobStage::Transcoding);
        if let Err(e) = self.transcoder.transcode(&job.source, local_path).await {
            stage(JobStage::FailedTranscode);
            return Err(e.into());
        }

        stage(JobStage::Uploading);
        self.publisher
            .publish(local_path, job.destination.as_str())
            .await?;

        Ok(())
    }
}

fn stage(stage: JobStage) {
    debug!(%stage, "Job stage");
}
