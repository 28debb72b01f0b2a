use crate::common::staging::OUTPUT_EXTENSION;
use crate::modules::job::error::JobError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub input_key: String,
    pub callback_address: Option<String>,
}

/// Object key the converted file is stored under in the output bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationKey(String);

impl DestinationKey {
    /// Swaps the extension of the last path segment for `mp3`, or appends
    /// one when there is none.
    pub fn from_input_key(input_key: &str) -> Self {
        let segment_start = input_key.rfind('/').map_or(0, |i| i + 1);
        let segment = &input_key[segment_start..];

        let key = match segment.rfind('.') {
            Some(dot) if dot + 1 < segment.len() => {
                format!("{}.{}", &input_key[..segment_start + dot], OUTPUT_EXTENSION)
            }
            _ => format!("{input_key}.{OUTPUT_EXTENSION}"),
        };
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request whose input has been located and is ready to run.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub request: JobRequest,
    pub source: String,
    pub destination: DestinationKey,
}

#[derive(Debug)]
pub enum JobOutcome {
    Succeeded { duration_ms: u64 },
    Failed { duration_ms: u64, error: JobError },
}

impl JobOutcome {
    pub fn duration_ms(&self) -> u64 {
        match self {
            JobOutcome::Succeeded { duration_ms } | JobOutcome::Failed { duration_ms, .. } => {
                *duration_ms
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WebhookPayload {
    Succeeded,
    Failed { error: String },
}

impl WebhookPayload {
    pub fn status(&self) -> &'static str {
        match self {
            WebhookPayload::Succeeded => "succeeded",
            WebhookPayload::Failed { .. } => "failed",
        }
    }
}

impl From<&JobOutcome> for WebhookPayload {
    fn from(outcome: &JobOutcome) -> Self {
        match outcome {
            JobOutcome::Succeeded { .. } => WebhookPayload::Succeeded,
            JobOutcome::Failed { error, .. } => WebhookPayload::Failed {
                error: error.to_string(),
            },
        }
    }
}

/// Per-job progress, logged as the pipeline moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Started,
    Transcoding,
    Uploading,
    FailedTranscode,
    Notifying,
    CleanedUp,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStage::Started => "STARTED",
            JobStage::Transcoding => "TRANSCODING",
            JobStage::Uploading => "UPLOADING",
            JobStage::FailedTranscode => "FAILED_TRANSCODE",
            JobStage::Notifying => "NOTIFYING",
            JobStage::CleanedUp => "CLEANED_UP",
        };
        f.write_str(name)
    }
}
