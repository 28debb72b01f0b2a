use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    InputBucket,
    OutputBucket,
    Region,
    EndpointUrl,
    AccessKey,
    SecretKey,
    FfmpegPath,
    StagingDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::InputBucket => "AWS_S3_INPUT_BUCKET",
            EnvKey::OutputBucket => "AWS_S3_OUTPUT_BUCKET",
            EnvKey::Region => "AWS_REGION",
            EnvKey::EndpointUrl => "AWS_ENDPOINT_URL",
            EnvKey::AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::StagingDir => "STAGING_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

/// Unset and empty values both read as `None`.
pub fn get_optional(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
