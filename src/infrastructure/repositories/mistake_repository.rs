use crate::domain::quiz::{Mistake, MistakeRepository};
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Mistake notebook stored as one JSON document on disk.
///
/// Every write replaces the whole document through a temp file and rename,
/// so readers never see a half-written notebook.
pub struct JsonFileMistakeRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileMistakeRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> anyhow::Result<Vec<Mistake>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        serde_json::from_slice(&raw)
            .with_context(|| format!("Malformed mistake notebook at {}", self.path.display()))
    }

    async fn write_all(&self, mistakes: &[Mistake]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(mistakes)?;

        tokio::fs::write(&tmp_path, body)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl MistakeRepository for JsonFileMistakeRepository {
    async fn list(&self) -> anyhow::Result<Vec<Mistake>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn prepend(&self, mistake: Mistake) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;

        let mut mistakes = self.read_all().await?;
        mistakes.insert(0, mistake);
        self.write_all(&mistakes).await?;

        tracing::debug!(
            path = %self.path.display(),
            total = mistakes.len(),
            "Mistake recorded"
        );
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
