use crate::common::staging::remove_quietly;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::{broadcast, oneshot};
use tracing::{error, info};

/// Lines of engine stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("transcoding engine failed: {0}")]
    Engine(String),
    #[error("transcoding engine exited without reporting a result")]
    Interrupted,
    #[error("transcoding finished but {0} was not written")]
    MissingOutput(PathBuf),
}

/// Lifecycle notifications for diagnostics. Nothing in the job flow reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeEvent {
    Started { command_line: String },
    Finished { output: PathBuf },
    Failed { error: String },
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Converts the media at `input` (any reference the engine can open,
    /// usually a presigned URL) into `output`.
    async fn transcode(&self, input: &str, output: &Path) -> Result<(), TranscodeError>;
}

/// The one output profile: audio only, MP3, constant 128 kbit/s.
pub fn mp3_arguments(input: &str, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-nostats".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        "128k".to_string(),
        "-f".to_string(),
        "mp3".to_string(),
        output.display().to_string(),
    ]
}

pub struct FfmpegTranscoder {
    binary: String,
    event_tx: Option<broadcast::Sender<TranscodeEvent>>,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            event_tx: None,
        }
    }

    #[cfg(test)]
    pub fn with_events(binary: impl Into<String>, event_tx: broadcast::Sender<TranscodeEvent>) -> Self {
        Self {
            binary: binary.into(),
            event_tx: Some(event_tx),
        }
    }

    fn emit(&self, event: TranscodeEvent) {
        match &event {
            TranscodeEvent::Started { command_line } => {
                info!("Spawned ffmpeg with command: {}", command_line)
            }
            TranscodeEvent::Finished { output } => info!(output = %output.display(), "ffmpeg finished"),
            TranscodeEvent::Failed { error } => error!(%error, "ffmpeg failed"),
        }
        if let Some(tx) = &self.event_tx {
            // No subscribers is fine
            let _ = tx.send(event);
        }
    }

    /// Spawns the engine and hands back the receiving end of its single
    /// completion message.
    fn spawn_engine(
        &self,
        arguments: &[String],
    ) -> Result<oneshot::Receiver<Result<(), TranscodeError>>, TranscodeError> {
        let child = Command::new(&self.binary)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TranscodeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = match child.wait_with_output().await {
                Ok(output) if output.status.success() => Ok(()),
                Ok(output) => Err(TranscodeError::Engine(format!(
                    "{}: {}",
                    output.status,
                    stderr_tail(&output.stderr)
                ))),
                Err(e) => Err(TranscodeError::Engine(e.to_string())),
            };
            let _ = done_tx.send(result);
        });

        Ok(done_rx)
    }

    async fn run(&self, input: &str, output: &Path) -> Result<(), TranscodeError> {
        let arguments = mp3_arguments(input, output);
        let completion = self.spawn_engine(&arguments)?;

        self.emit(TranscodeEvent::Started {
            command_line: format!("{} {}", self.binary, arguments.join(" ")),
        });

        completion.await.map_err(|_| TranscodeError::Interrupted)??;

        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(TranscodeError::MissingOutput(output.to_path_buf())),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &str, output: &Path) -> Result<(), TranscodeError> {
        match self.run(input, output).await {
            Ok(()) => {
                self.emit(TranscodeEvent::Finished {
                    output: output.to_path_buf(),
                });
                Ok(())
            }
            Err(e) => {
                self.emit(TranscodeEvent::Failed {
                    error: e.to_string(),
                });
                remove_quietly(output).await.log("remove partial output");
                Err(e)
            }
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    // progress output separates records with '\r'
    let lines: Vec<&str> = text
        .split(['\n', '\r'])
        .filter(|l| !l.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_encode_fixed_audio_profile() {
        let args = mp3_arguments("https://bucket/in.wav?sig=1", Path::new("/tmp/out.mp3"));

        let joined = args.join(" ");
        assert!(joined.contains("-i https://bucket/in.wav?sig=1"));
        assert!(joined.contains("-vn"));
        assert!(joined.contains("-b:a 128k"));
        assert!(joined.contains("-f mp3"));
        assert!(joined.contains("-nostats"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp3"));
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let stderr = b"a\nb\n\nc\nd\ne\nf\ng\n";
        assert_eq!(stderr_tail(stderr), "c\nd\ne\nf\ng");
    }

    #[test]
    fn stderr_tail_splits_progress_records() {
        let mut stderr = Vec::new();
        for i in 0..500 {
            stderr.extend_from_slice(format!("size={i}kB time=00:00:{i:02}\r").as_bytes());
        }
        stderr.extend_from_slice(b"\nError while decoding stream #0:0\n");

        let tail = stderr_tail(&stderr);

        assert_eq!(tail.lines().count(), 5);
        assert!(tail.ends_with("Error while decoding stream #0:0"));
        assert!(!tail.contains("size=0kB"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = FfmpegTranscoder::new("definitely-not-an-ffmpeg-binary");

        let err = transcoder
            .transcode("in.wav", &dir.path().join("out.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscodeError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn engine_failure_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        std::fs::write(&output, b"partial").unwrap();

        // `false` ignores its arguments and exits non-zero
        let transcoder = FfmpegTranscoder::new("false");
        let err = transcoder.transcode("in.wav", &output).await.unwrap_err();

        assert!(matches!(err, TranscodeError::Engine(_)));
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_exit_without_output_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");

        let transcoder = FfmpegTranscoder::new("true");
        let err = transcoder.transcode("in.wav", &output).await.unwrap_err();

        assert!(matches!(err, TranscodeError::MissingOutput(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn start_event_carries_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let (tx, mut rx) = broadcast::channel(8);

        let transcoder = FfmpegTranscoder::with_events("true", tx);
        let _ = transcoder.transcode("in.wav", &output).await;

        match rx.recv().await.unwrap() {
            TranscodeEvent::Started { command_line } => {
                assert!(command_line.starts_with("true "));
                assert!(command_line.contains("-b:a 128k"));
            }
            other => panic!("unexpected first event: {other:?}"),
        }
        assert!(matches!(rx.recv().await.unwrap(), TranscodeEvent::Failed { .. }));
    }
}
