use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tokio_util::task::TaskTracker;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod workers;

use config::settings::AppConfig;
use infrastructure::storage::publisher::OutputPublisher;
use infrastructure::storage::s3::StorageService;
use infrastructure::webhook::client::WebhookNotifier;
use modules::job::pipeline::JobPipeline;
use state::AppState;
use workers::transcoder::FfmpegTranscoder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("missing required environment variable")?;

    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| format!("failed to create staging dir {}", config.staging_dir.display()))?;

    let storage = Arc::new(StorageService::new(
        &config.region,
        config.endpoint_url.as_deref(),
        &config.access_key,
        &config.secret_key,
    ));

    let pipeline = JobPipeline::new(
        Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone())),
        OutputPublisher::new(storage.clone(), config.output_bucket.clone()),
        WebhookNotifier::new(reqwest::Client::new()),
        config.staging_dir.clone(),
    );

    let port = config.server_port;
    info!(staging_dir = %config.staging_dir.display(), "🎧 Job pipeline ready");
    let state = AppState::new(config, storage, pipeline);
    let jobs = state.jobs.clone();

    let app = app::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!("🚀 Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drain_jobs(&jobs).await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("🛑 Shutting down, no longer accepting jobs");
}

/// Lets accepted background jobs finish, so each still reaches its webhook.
async fn drain_jobs(jobs: &TaskTracker) {
    jobs.close();
    if !jobs.is_empty() {
        info!(pending = jobs.len(), "⏳ Waiting for background jobs");
    }
    jobs.wait().await;
    info!("✅ All background jobs finished");
}
