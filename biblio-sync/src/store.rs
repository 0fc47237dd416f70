//! In-memory entity stores.
//!
//! A store is the last successfully fetched snapshot of one collection. It is
//! replaced wholesale on every load and never patched in place: re-fetching
//! is the only reconciliation with the server.

use crate::api::{CatalogApi, Listable};
use crate::error::{CatalogError, CatalogResult};
use biblio_types::{Entity, RecordId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered snapshot of one collection, keyed by record id.
///
/// Cloning is cheap and yields a read-only view that stays consistent even
/// if the owning store is reloaded afterwards.
#[derive(Debug, Clone)]
pub struct EntityStore<E> {
    records: Arc<[E]>,
    index: Arc<HashMap<RecordId, usize>>,
    loaded: bool,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty, never-loaded store.
    pub fn new() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            index: Arc::new(HashMap::new()),
            loaded: false,
        }
    }

    /// Builds a loaded store from records, in order.
    ///
    /// Later duplicates of an id are dropped so each id has one representation.
    pub fn from_records(records: Vec<E>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if index.contains_key(record.id()) {
                warn!("dropping duplicate {} {}", E::KIND, record.id());
                continue;
            }
            index.insert(record.id().clone(), unique.len());
            unique.push(record);
        }
        Self {
            records: Arc::from(unique),
            index: Arc::new(index),
            loaded: true,
        }
    }

    /// Looks a record up in the last successful load.
    pub fn lookup(&self, id: &RecordId) -> CatalogResult<&E> {
        self.get(id).ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Like [`lookup`](Self::lookup) but returns `None` when absent.
    pub fn get(&self, id: &RecordId) -> Option<&E> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    /// Records in server order.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.records.iter()
    }

    /// Ids in server order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.iter().map(Entity::id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether at least one load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns a read-only snapshot sharing this store's data.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

impl<E: Listable> EntityStore<E> {
    /// Replaces the contents with a fresh fetch and returns the record count.
    ///
    /// On failure the previous contents stay available and the error is
    /// returned as [`CatalogError::Load`].
    pub async fn load(&mut self, api: &dyn CatalogApi) -> CatalogResult<usize> {
        match E::fetch_all(api).await {
            Ok(records) => {
                *self = Self::from_records(records);
                debug!("loaded {} {}", self.len(), E::KIND.plural());
                Ok(self.len())
            }
            Err(source) => {
                warn!("failed to load {}: {source}", E::KIND.plural());
                Err(CatalogError::Load {
                    kind: E::KIND,
                    source,
                })
            }
        }
    }
}
