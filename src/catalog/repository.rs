use super::{Catalog, CatalogError, CatalogItem, ItemFilters, ItemPatch, NewItem};
use crate::store::CatalogStore;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// How exact-title search compares titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMatch {
    /// Match independent of case (the default).
    #[default]
    CaseInsensitive,
    /// Require an identical title.
    CaseSensitive,
}

impl TitleMatch {
    #[must_use]
    pub fn matches(self, candidate: &str, query: &str) -> bool {
        match self {
            Self::CaseInsensitive => candidate.to_lowercase() == query.to_lowercase(),
            Self::CaseSensitive => candidate == query,
        }
    }
}

/// Owns the authoritative in-memory catalog and guarantees every mutation
/// is durably persisted before the mutating call returns.
///
/// Mutations serialize on `write_lock`, build the successor state on a
/// copy, persist it, and only then publish it. A failed save therefore
/// leaves the in-memory state exactly as it was. Reads take the shared
/// lock only and may run concurrently with an in-flight mutation.
pub struct CatalogRepository {
    state: RwLock<Catalog>,
    write_lock: Mutex<()>,
    store: Box<dyn CatalogStore>,
    title_match: TitleMatch,
}

impl CatalogRepository {
    /// Load the persisted catalog and build the repository around it.
    ///
    /// The id counter is floored to `max(existing ids) + 1` so a stale
    /// persisted counter can never cause an id to be handed out twice.
    pub async fn open(store: Box<dyn CatalogStore>) -> Result<Self, CatalogError> {
        let mut catalog = store.load().await?;
        let floor = catalog
            .items
            .keys()
            .copied()
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        catalog.next_id = catalog.next_id.max(floor);
        info!("Opened catalog with {} item(s)", catalog.items.len());
        Ok(Self {
            state: RwLock::new(catalog),
            write_lock: Mutex::new(()),
            store,
            title_match: TitleMatch::default(),
        })
    }

    /// Set how exact-title search compares titles.
    #[must_use]
    pub fn with_title_match(mut self, title_match: TitleMatch) -> Self {
        self.title_match = title_match;
        self
    }

    /// List items, sorted by id (which is also creation order).
    ///
    /// A present `exact_title` activates search mode: the other filters
    /// are ignored and at most one item is returned, the lowest-id one
    /// whose title matches.
    pub async fn list(&self, filters: &ItemFilters) -> Vec<CatalogItem> {
        if let Some(query) = &filters.exact_title {
            return self.search_title(query).await;
        }
        let state = self.state.read().await;
        let mut items: Vec<CatalogItem> = state
            .items
            .values()
            .filter(|item| filters.matches(item))
            .cloned()
            .collect();
        drop(state);
        items.sort_by_key(|item| item.id);
        items
    }

    async fn search_title(&self, query: &str) -> Vec<CatalogItem> {
        let state = self.state.read().await;
        state
            .items
            .values()
            .filter(|item| self.title_match.matches(&item.title, query))
            .min_by_key(|item| item.id)
            .cloned()
            .map_or_else(Vec::new, |item| vec![item])
    }

    pub async fn get(&self, id: u64) -> Result<CatalogItem, CatalogError> {
        self.state
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id))
    }

    /// Number of items currently in the catalog.
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// Create an item. The id is assigned under the write lock and the
    /// catalog is persisted before the item becomes visible.
    pub async fn create(&self, new_item: NewItem) -> Result<CatalogItem, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.state.read().await.clone();
        let item = new_item.into_item(next.allocate_id())?;
        next.items.insert(item.id, item.clone());
        self.store.save(&next).await?;
        self.commit(next).await;
        debug!("Created item {} '{}'", item.id, item.title);
        Ok(item)
    }

    /// Apply a partial update. Absent fields keep their stored values.
    pub async fn update(&self, id: u64, patch: &ItemPatch) -> Result<CatalogItem, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.state.read().await.clone();
        let current = next
            .items
            .get(&id)
            .ok_or_else(|| CatalogError::NotFound(id))?;
        let updated = patch.apply_to(current)?;
        next.items.insert(id, updated.clone());
        self.store.save(&next).await?;
        self.commit(next).await;
        debug!("Updated item {}", id);
        Ok(updated)
    }

    /// Remove an item. Returns whether anything was removed; deleting an
    /// absent id is not an error and does not touch the store.
    pub async fn delete(&self, id: u64) -> Result<bool, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.state.read().await.clone();
        if next.items.remove(&id).is_none() {
            return Ok(false);
        }
        self.store.save(&next).await?;
        self.commit(next).await;
        debug!("Deleted item {}", id);
        Ok(true)
    }

    /// Publish a fully persisted catalog as the authoritative state.
    /// Callers hold `write_lock`.
    async fn commit(&self, next: Catalog) {
        *self.state.write().await = next;
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
