use crate::common::best_effort::BestEffort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const OUTPUT_EXTENSION: &str = "mp3";

/// Owns the job-local output file and removes it exactly once.
///
/// `cleanup` consumes the guard, so a second removal cannot be written. If a
/// job is torn down before reaching cleanup the file is removed on drop.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
    removed: bool,
}

impl StagingFile {
    /// Picks a fresh path under `dir`. Nothing is created on disk.
    pub fn allocate(dir: &Path) -> Self {
        let name = format!("{}.{}", Uuid::new_v4(), OUTPUT_EXTENSION);
        Self {
            path: dir.join(name),
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn cleanup(mut self) -> BestEffort {
        self.removed = true;
        remove_quietly(&self.path).await
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Deletes `path`, reporting an already missing file as `Skipped`.
pub async fn remove_quietly(path: &Path) -> BestEffort {
    match tokio::fs::remove_file(path).await {
        Ok(()) => BestEffort::Completed,
        Err(e) if e.kind() == ErrorKind::NotFound => BestEffort::Skipped,
        Err(e) => BestEffort::Failed(format!("{}: {}", path.display(), e)),
    }
}
