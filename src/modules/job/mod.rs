use crate::state::AppState;
use axum::Router;
use axum::routing::post;

pub mod dto;
pub mod error;
pub mod handler;
pub mod model;
pub mod pipeline;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::transcode_sync))
        .route("/async", post(handler::transcode_async))
}
