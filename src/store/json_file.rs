use super::{CatalogStore, OnCorrupt, StoreError};
use crate::catalog::Catalog;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::warn;

/// Catalog store backed by a single pretty-printed JSON file.
///
/// Every save writes a fresh temp file next to the target and renames it
/// into place, so a crash mid-write can never leave a half-written
/// catalog behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    on_corrupt: OnCorrupt,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_corrupt: OnCorrupt::default(),
        }
    }

    #[must_use]
    pub fn with_on_corrupt(mut self, on_corrupt: OnCorrupt) -> Self {
        self.on_corrupt = on_corrupt;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load(&self) -> Result<Catalog, StoreError> {
        if !self.path.exists() {
            return Ok(Catalog::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&content) {
            Ok(catalog) => Ok(catalog),
            Err(e) => match self.on_corrupt {
                OnCorrupt::ResetEmpty => {
                    warn!(
                        "Catalog file {} is unreadable ({}), starting with an empty catalog",
                        self.path.display(),
                        e
                    );
                    Ok(Catalog::new())
                }
                OnCorrupt::Fail => Err(StoreError::Corrupt(format!(
                    "{}: {e}",
                    self.path.display()
                ))),
            },
        }
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(catalog)?;
        atomic_write(&self.path, content).await?;
        Ok(())
    }
}

/// Write `content` to `path` via a temp file in the same directory plus
/// an atomic rename. The temp file is cleaned up if any step fails.
async fn atomic_write(path: &Path, content: String) -> io::Result<()> {
    // A bare filename has an empty parent; temp files then go to the
    // current directory.
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let target_path = path.to_path_buf();

    // Sync tempfile operations run in a blocking task.
    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        // Renaming consumes the temp file, preventing auto-deletion.
        temp_file.persist(&target_path)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
