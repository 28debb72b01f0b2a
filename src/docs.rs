use crate::modules::job::dto::{JobResponse, TranscodeRequest};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::job::handler::transcode_sync,
        crate::modules::job::handler::transcode_async,
    ),
    components(
        schemas(TranscodeRequest, JobResponse)
    ),
    tags(
        (name = "Jobs", description = "Audio transcoding jobs")
    )
)]
pub struct ApiDoc;
