//! Per-request upload spooling.
//!
//! Each upload gets its own uniquely named file, so concurrent uploads never
//! overwrite each other. The file is removed when the guard is dropped.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A spooled upload on disk, deleted on drop.
#[derive(Debug)]
pub struct SpoolFile {
    path: PathBuf,
}

impl SpoolFile {
    /// Write `contents` to a fresh file inside `dir`, creating `dir` if needed.
    pub async fn create(dir: &Path, contents: &[u8]) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let spool = Self {
            path: dir.join(format!("upload-{}.txt", Uuid::new_v4())),
        };
        tokio::fs::write(&spool.path, contents).await?;

        Ok(spool)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpoolFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove upload spool file"
                );
            }
        }
    }
}
