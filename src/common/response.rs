use crate::modules::job::dto::JobResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub struct ApiSuccess(pub JobResponse, pub StatusCode);

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        let (response, status) = (self.0, self.1);
        (status, Json(response)).into_response()
    }
}

/// Request-level failure: `{ message, error }` with a non-2xx status.
pub struct ApiError {
    pub message: String,
    pub error: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(message: &str, error: impl ToString, status: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            error: error.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = JobResponse {
            message: self.message,
            error: Some(self.error),
        };
        (self.status, Json(response)).into_response()
    }
}
