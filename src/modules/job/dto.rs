use super::model::JobRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeRequest {
    /// Object key in the input bucket
    #[validate(length(min = 1, message = "fileKey must not be empty"))]
    pub file_key: String,
    /// Receives the final job status
    #[validate(url(message = "webhookUrl must be a valid URL"))]
    pub webhook_url: Option<String>,
}

impl From<TranscodeRequest> for JobRequest {
    fn from(req: TranscodeRequest) -> Self {
        Self {
            input_key: req.file_key,
            callback_address: req.webhook_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResponse {
    pub fn started() -> Self {
        Self {
            message: "Job started".to_string(),
            error: None,
        }
    }

    pub fn finished(duration_ms: u64) -> Self {
        Self {
            message: format!("Job finished in {duration_ms}ms"),
            error: None,
        }
    }

    pub fn failed(duration_ms: u64, error: String) -> Self {
        Self {
            message: format!("Job error after {duration_ms}ms"),
            error: Some(error),
        }
    }
}
