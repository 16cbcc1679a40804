use crate::extractor::MediaExtractor;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Process-wide immutable state, constructed once at startup and handed to
/// each handler via `Extension`.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn MediaExtractor>,
    pub downloads_dir: PathBuf,
    pub retries: u32,
    pub fragment_retries: u32,
}

impl AppState {
    pub async fn new(
        downloads_dir: &Path,
        extractor: Arc<dyn MediaExtractor>,
        retries: u32,
        fragment_retries: u32,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(downloads_dir).await?;
        sweep_downloads(downloads_dir).await?;

        Ok(AppState {
            extractor,
            downloads_dir: downloads_dir.to_path_buf(),
            retries,
            fragment_retries,
        })
    }
}

/// Remove leftover artifacts from previous runs. Best-effort: a file that
/// vanished concurrently or that we lack permission for is skipped;
/// anything else is logged and skipped too. Subdirectories are left alone.
async fn sweep_downloads(downloads_dir: &Path) -> std::io::Result<()> {
    let mut removed = 0usize;
    let mut entries = tokio::fs::read_dir(downloads_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::NotFound | ErrorKind::PermissionDenied
                ) =>
            {
                debug!(?path, %error, "Skipping leftover file");
            }
            Err(error) => {
                warn!(?path, %error, "Failed to remove leftover file");
            }
        }
    }

    if removed > 0 {
        info!(removed, "Swept leftover downloads");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unique sweep directory removed again when the test ends.
    struct TempSweepDir(PathBuf);

    impl Drop for TempSweepDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[tokio::test]
    async fn sweep_removes_files_and_keeps_directories() {
        let guard = TempSweepDir(
            std::env::temp_dir().join(format!("tiktok-dl-sweep-{}", uuid::Uuid::new_v4())),
        );
        let dir = &guard.0;
        tokio::fs::create_dir_all(dir.join("nested")).await.unwrap();
        tokio::fs::write(dir.join("aaaabbbbcccc.mp4"), b"stale")
            .await
            .unwrap();
        tokio::fs::write(dir.join("ddddeeeeffff.mp3"), b"stale")
            .await
            .unwrap();

        sweep_downloads(dir).await.unwrap();

        assert!(!dir.join("aaaabbbbcccc.mp4").exists());
        assert!(!dir.join("ddddeeeeffff.mp3").exists());
        assert!(dir.join("nested").exists());
    }
}
