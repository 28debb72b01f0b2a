use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub input_bucket: String,
    pub output_bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub ffmpeg_path: String,
    pub staging_dir: PathBuf,
}

impl AppConfig {
    /// Credentials default to empty strings; a bad key only shows up on the
    /// first storage call.
    pub fn new() -> Result<Self, std::env::VarError> {
        let staging_dir = env::get_optional(EnvKey::StagingDir)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("audio-transcoder"));

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            input_bucket: env::get(EnvKey::InputBucket)?,
            output_bucket: env::get(EnvKey::OutputBucket)?,
            region: env::get_or(EnvKey::Region, "us-east-1"),
            endpoint_url: env::get_optional(EnvKey::EndpointUrl),
            access_key: env::get_or(EnvKey::AccessKey, ""),
            secret_key: env::get_or(EnvKey::SecretKey, ""),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            staging_dir,
        })
    }
}
