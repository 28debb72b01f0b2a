use crate::config::settings::AppConfig;
use crate::infrastructure::storage::SourceLocator;
use crate::modules::job::pipeline::JobPipeline;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub locator: Arc<dyn SourceLocator>,
    pub pipeline: Arc<JobPipeline>,
    /// Background jobs accepted through `/async`; drained on shutdown.
    pub jobs: TaskTracker,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        locator: Arc<dyn SourceLocator>,
        pipeline: JobPipeline,
    ) -> Self {
        Self {
            config,
            locator,
            pipeline: Arc::new(pipeline),
            jobs: TaskTracker::new(),
        }
    }
}
