use crate::infrastructure::storage::StorageError;
use crate::infrastructure::storage::publisher::PublishError;
use crate::workers::transcoder::TranscodeError;

/// Why an accepted job failed.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Why a request never became a job.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("failed to resolve input object: {0}")]
    Resolution(#[from] StorageError),
}
