//! In-process repository implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Repository;
use crate::domain::AggregateRoot;
use crate::errors::AppResult;

/// Repository keeping aggregates in a process-local ordered map.
pub struct MemoryRepository<E: AggregateRoot> {
    items: RwLock<BTreeMap<E::Id, E>>,
}

impl<E: AggregateRoot> MemoryRepository<E> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a repository pre-filled with aggregates
    pub fn with_items(items: impl IntoIterator<Item = E>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id().clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<E: AggregateRoot> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: AggregateRoot> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: &E::Id) -> AppResult<Option<E>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<E>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn save(&self, entity: E) -> AppResult<E> {
        self.items
            .write()
            .await
            .insert(entity.id().clone(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &E::Id) -> AppResult<bool> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.items.read().await.len())
    }
}
