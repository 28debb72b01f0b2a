use tracing::{debug, warn};

/// Result of a secondary operation whose failure must never affect a job.
///
/// There is deliberately no conversion into an error type; callers log the
/// value and drop it.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    Completed,
    /// Nothing to do, e.g. no callback address or the file was already gone.
    Skipped,
    Failed(String),
}

impl BestEffort {
    pub fn log(self, operation: &str) {
        match self {
            BestEffort::Completed => debug!(operation, "completed"),
            BestEffort::Skipped => debug!(operation, "skipped"),
            BestEffort::Failed(reason) => warn!(operation, %reason, "best-effort operation failed"),
        }
    }
}
