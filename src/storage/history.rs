// src/storage/history.rs

//! File-backed delivery history.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// The set of links delivered in all prior runs, persisted as one link per
/// line, UTF-8, newline-terminated.
///
/// The file is append-only: existing lines are never rewritten or reordered,
/// and a run appends at most once, only after the transport confirmed
/// delivery.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the delivered-link set. A missing file is a valid initial state
    /// and yields an empty set; blank lines are ignored.
    pub async fn load(&self) -> Result<HashSet<String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let text = String::from_utf8(bytes)?;
                Ok(text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashSet::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Durably append delivered links, one per line. An empty batch is a
    /// no-op and does not touch the file.
    pub async fn append(&self, links: &[String]) -> Result<()> {
        if links.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for link in links {
            buffer.push_str(link);
            buffer.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
