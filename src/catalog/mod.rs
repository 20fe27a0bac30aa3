//! Catalog domain: the item model, typed create/patch inputs, and the
//! repository that owns the authoritative in-memory state.

mod item;
mod repository;

pub use item::{parse_iso_date, CatalogItem, FieldPatch, ItemFilters, ItemPatch, NewItem};
pub use repository::{CatalogRepository, TitleMatch};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Title is required and must be non-empty")]
    TitleRequired,

    #[error("Item type is required and must be non-empty")]
    ItemTypeRequired,

    #[error("Invalid date '{0}', expected ISO format YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Item {0} not found")]
    NotFound(u64),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
}

fn default_next_id() -> u64 {
    1
}

/// The full persisted state: every item keyed by id, plus the id counter.
///
/// Serialized as one JSON document; map keys are string-encoded ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Next id to assign. Monotonic; ids are never reused after deletes.
    #[serde(default = "default_next_id")]
    pub next_id: u64,
    #[serde(default)]
    pub items: HashMap<u64, CatalogItem>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            items: HashMap::new(),
        }
    }

    /// Hand out the next id and advance the counter.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
