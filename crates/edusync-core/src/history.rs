//! Local result history backends.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::model::HistoryEntry;
use crate::traits::ResultHistory;

/// History stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => Ok(Some(c)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("failed to read result history: {}", self.path.display())
            }),
        }
    }

    fn parse(&self, content: &str) -> Result<Vec<HistoryEntry>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(content).with_context(|| {
            format!("failed to parse result history: {}", self.path.display())
        })
    }

    /// A path next to the history file, named `<file><suffix>`.
    fn sibling(&self, suffix: &str) -> Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .with_context(|| format!("not a file path: {}", self.path.display()))?;
        let mut name = name.to_os_string();
        name.push(suffix);
        Ok(self.path.with_file_name(name))
    }

    /// Move an unreadable history file aside so its contents can be recovered.
    async fn set_aside(&self) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let backup = self.sibling(&format!(".corrupt-{stamp}"))?;
        tokio::fs::rename(&self.path, &backup)
            .await
            .with_context(|| format!("failed to move aside {}", self.path.display()))?;
        Ok(backup)
    }

    /// Write to a temporary sibling and rename it over the history file.
    async fn write_atomic(&self, json: &str) -> Result<()> {
        let tmp = self.sibling(".tmp")?;
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to write result history: {}", self.path.display()))
    }
}

#[async_trait]
impl ResultHistory for JsonFileHistory {
    async fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let mut entries = match self.read_raw().await? {
            None => Vec::new(),
            Some(content) => match self.parse(&content) {
                Ok(existing) => existing,
                Err(e) => {
                    let backup = self.set_aside().await?;
                    tracing::warn!(
                        backup = %backup.display(),
                        "starting a new result history: {e:#}"
                    );
                    Vec::new()
                }
            },
        };
        entries.push(entry.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        self.write_atomic(&json).await?;

        tracing::debug!(path = %self.path.display(), total = entries.len(), "result appended");
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<HistoryEntry>> {
        match self.read_raw().await? {
            Some(content) => self.parse(&content),
            None => Ok(Vec::new()),
        }
    }
}

/// In-memory history, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultHistory for MemoryHistory {
    async fn append(&self, entry: &HistoryEntry) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("result history lock poisoned"))?
            .push(entry.clone());
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("result history lock poisoned"))?
            .clone())
    }
}
