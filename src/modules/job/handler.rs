use super::dto::{JobResponse, TranscodeRequest};
use super::error::SubmitError;
use super::model::JobOutcome;
use super::service::JobService;
use crate::common::response::{ApiError, ApiSuccess};
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

/// Convert a stored media file and wait for the result
///
/// Job failures still answer 200; check `error` in the body.
#[utoipa::path(
    post,
    path = "/",
    request_body = TranscodeRequest,
    responses(
        (status = 200, description = "Job finished or failed", body = JobResponse),
        (status = 400, description = "Invalid request", body = JobResponse),
        (status = 502, description = "Input object could not be located", body = JobResponse)
    ),
    tag = "Jobs"
)]
pub async fn transcode_sync(
    State(state): State<AppState>,
    payload: Result<Json<TranscodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match parse_request(payload) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    match JobService::run_sync(state, req.into()).await {
        Ok(JobOutcome::Succeeded { duration_ms }) => {
            ApiSuccess(JobResponse::finished(duration_ms), StatusCode::OK).into_response()
        }
        Ok(JobOutcome::Failed { duration_ms, error }) => {
            ApiSuccess(JobResponse::failed(duration_ms, error.to_string()), StatusCode::OK)
                .into_response()
        }
        Err(e) => submit_error(e).into_response(),
    }
}

/// Start a conversion in the background
///
/// The final status is only delivered to `webhookUrl`.
#[utoipa::path(
    post,
    path = "/async",
    request_body = TranscodeRequest,
    responses(
        (status = 200, description = "Job accepted", body = JobResponse),
        (status = 400, description = "Invalid request", body = JobResponse),
        (status = 502, description = "Input object could not be located", body = JobResponse)
    ),
    tag = "Jobs"
)]
pub async fn transcode_async(
    State(state): State<AppState>,
    payload: Result<Json<TranscodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match parse_request(payload) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    match JobService::run_async(state, req.into()).await {
        Ok(()) => ApiSuccess(JobResponse::started(), StatusCode::OK).into_response(),
        Err(e) => submit_error(e).into_response(),
    }
}

/// Malformed JSON, missing fields and failed validation all answer 400.
fn parse_request(
    payload: Result<Json<TranscodeRequest>, JsonRejection>,
) -> Result<TranscodeRequest, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        ApiError::new("Invalid request", rejection.body_text(), StatusCode::BAD_REQUEST)
    })?;
    req.validate()
        .map_err(|e| ApiError::new("Invalid request", e, StatusCode::BAD_REQUEST))?;
    Ok(req)
}

fn submit_error(e: SubmitError) -> ApiError {
    match e {
        SubmitError::Resolution(_) => {
            ApiError::new("Failed to locate input", e, StatusCode::BAD_GATEWAY)
        }
    }
}
