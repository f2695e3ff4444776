//! Batched file writes with an explicit completion barrier.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Writes `contents` to `path`, creating missing parent directories.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let mut file = fs::File::create(path).await.map_err(io_err)?;
    file.write_all(contents).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)?;
    Ok(())
}

/// Issues writes in the background and lets the caller wait for all of
/// them at once.
///
/// `submit` must be called from within a tokio runtime.
#[derive(Default)]
pub struct DocumentWriter {
    pending: JoinSet<Result<PathBuf, WriteError>>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts writing `contents` to `path` without waiting for it.
    pub fn submit(&mut self, path: PathBuf, contents: Vec<u8>) {
        self.pending.spawn(async move {
            write_file(&path, &contents).await?;
            Ok(path)
        });
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Waits for every submitted write.
    ///
    /// All writes are drained even after a failure; the first failure is
    /// returned, otherwise the number of files written.
    pub async fn finish(mut self) -> Result<usize, WriteError> {
        let mut written = 0;
        let mut first_error = None;

        while let Some(joined) = self.pending.join_next().await {
            let result = joined.map_err(WriteError::from).and_then(|r| r);
            match result {
                Ok(path) => {
                    debug!("Wrote {}", path.display());
                    written += 1;
                }
                Err(err) => {
                    error!("{}", err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1").join("2");

        write_file(&path, b"{}").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_finish_waits_for_all_writes() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = DocumentWriter::new();
        for i in 0..20 {
            writer.submit(
                temp_dir.path().join("c").join(i.to_string()),
                i.to_string().into_bytes(),
            );
        }
        assert_eq!(writer.pending(), 20);

        let written = writer.finish().await.unwrap();

        assert_eq!(written, 20);
        for i in 0..20 {
            let content = std::fs::read_to_string(temp_dir.path().join("c").join(i.to_string()))
                .unwrap();
            assert_eq!(content, i.to_string());
        }
    }

    #[tokio::test]
    async fn test_finish_reports_failed_write() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();

        let mut writer = DocumentWriter::new();
        writer.submit(temp_dir.path().join("ok"), b"1".to_vec());
        writer.submit(blocker.join("song"), b"2".to_vec());

        let err = writer.finish().await.unwrap_err();

        assert!(matches!(err, WriteError::Io { ref path, .. } if path == &blocker.join("song")));
        assert!(temp_dir.path().join("ok").exists());
    }

    #[tokio::test]
    async fn test_finish_without_writes() {
        assert_eq!(DocumentWriter::new().finish().await.unwrap(), 0);
    }
}
