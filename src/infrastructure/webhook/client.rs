use crate::common::best_effort::BestEffort;
use crate::modules::job::model::WebhookPayload;
use tracing::info;

/// Delivers job status to caller-supplied callback addresses.
#[derive(Clone, Default)]
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// One attempt, no retry. Delivery problems come back as `Failed` and
    /// are for logging only.
    pub async fn notify(&self, address: Option<&str>, payload: &WebhookPayload) -> BestEffort {
        let Some(address) = address else {
            return BestEffort::Skipped;
        };

        let response = match self.client.post(address).json(payload).send().await {
            Ok(response) => response,
            Err(e) => return BestEffort::Failed(format!("webhook {address}: {e}")),
        };

        if let Err(e) = response.error_for_status() {
            return BestEffort::Failed(format!("webhook {address}: {e}"));
        }

        info!(address, status = payload.status(), "📨 Sent webhook");
        BestEffort::Completed
    }
}
