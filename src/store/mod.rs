//! Durable persistence for the catalog.
//!
//! The repository talks to a [`CatalogStore`]; the shipped implementation
//! is [`JsonFileStore`], which keeps the whole catalog in one JSON file
//! and replaces it atomically on every save.

mod json_file;

pub use json_file::JsonFileStore;

use crate::catalog::Catalog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt catalog file {0}")]
    Corrupt(String),
}

/// What to do when the catalog file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnCorrupt {
    /// Log the damage and start from an empty catalog. The broken file is
    /// left in place until the next successful save replaces it.
    #[default]
    ResetEmpty,
    /// Refuse to start.
    Fail,
}

/// Parse an on-corrupt policy name, falling back to the default.
///
/// Accepts `reset-empty` (aliases `reset_empty`, `reset`) and `fail`
/// (alias `strict`), case-insensitively.
#[must_use]
pub fn parse_on_corrupt(value: &str) -> OnCorrupt {
    match value.to_lowercase().as_str() {
        "reset-empty" | "reset_empty" | "reset" => OnCorrupt::ResetEmpty,
        "fail" | "strict" => OnCorrupt::Fail,
        other => {
            warn!("Unknown on-corrupt policy '{}', using 'reset-empty'", other);
            OnCorrupt::ResetEmpty
        }
    }
}

/// Persistence backend for the catalog.
///
/// `save` must replace the previous snapshot all-or-nothing: a reader
/// observing the file after a crash sees either the old snapshot or the
/// new one, never a torn mix.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the persisted catalog, or an empty one when no snapshot exists.
    async fn load(&self) -> Result<Catalog, StoreError>;

    /// Durably replace the snapshot with `catalog`.
    async fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}
