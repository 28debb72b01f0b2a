use super::error::SubmitError;
use super::model::{DestinationKey, JobOutcome, JobRequest, PreparedJob};
use crate::infrastructure::storage::SOURCE_REFERENCE_TTL;
use crate::state::AppState;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub struct JobService;

impl JobService {
    /// Locates the input. Failures here surface to the caller directly in
    /// both modes since no job has been accepted yet.
    pub async fn prepare(state: &AppState, request: JobRequest) -> Result<PreparedJob, SubmitError> {
        let source = state
            .locator
            .resolve_readable_reference(
                &state.config.input_bucket,
                &request.input_key,
                SOURCE_REFERENCE_TTL,
            )
            .await?;
        let destination = DestinationKey::from_input_key(&request.input_key);

        Ok(PreparedJob {
            request,
            source,
            destination,
        })
    }

    pub async fn run_sync(state: AppState, request: JobRequest) -> Result<JobOutcome, SubmitError> {
        let job = Self::prepare(&state, request).await?;
        let span = job_span(&job);

        Ok(state.pipeline.execute(job).instrument(span).await)
    }

    /// Accepts the job and runs it in the background. The only report of its
    /// result is the webhook.
    pub async fn run_async(state: AppState, request: JobRequest) -> Result<(), SubmitError> {
        let job = Self::prepare(&state, request).await?;

        let span = job_span(&job);
        let pipeline = state.pipeline.clone();
        state.jobs.spawn(
            async move {
                let outcome = pipeline.execute(job).await;
                info!(
                    success = outcome.is_success(),
                    duration_ms = outcome.duration_ms(),
                    "🎬 Background job done"
                );
            }
            .instrument(span),
        );

        Ok(())
    }
}

fn job_span(job: &PreparedJob) -> tracing::Span {
    info_span!(
        "job",
        id = %Uuid::new_v4(),
        input_key = %job.request.input_key,
        destination = %job.destination
    )
}
