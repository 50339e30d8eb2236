//! In-memory repository.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use depot_core::{DepotError, DepotResult, Entity, EntityId};

use crate::repository::{AsyncRepository, Repository};

/// In-memory keyed store.
///
/// Intended for tests/dev. Not optimized for performance. Rows are keyed by
/// id, so iteration (and `get_all`) is ascending id order.
pub struct InMemoryRepository<E> {
    rows: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicI64,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn read(&self) -> DepotResult<std::sync::RwLockReadGuard<'_, BTreeMap<EntityId, E>>> {
        self.rows
            .read()
            .map_err(|_| DepotError::persistence("lock poisoned"))
    }

    fn write(&self) -> DepotResult<std::sync::RwLockWriteGuard<'_, BTreeMap<EntityId, E>>> {
        self.rows
            .write()
            .map_err(|_| DepotError::persistence("lock poisoned"))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn get_all(&self) -> DepotResult<Vec<E>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn exists(&self, id: EntityId) -> DepotResult<bool> {
        Ok(self.read()?.contains_key(&id))
    }

    fn query(&self, predicate: &(dyn Fn(&E) -> bool + Send + Sync)) -> DepotResult<Vec<E>> {
        Ok(self
            .read()?
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect())
    }

    fn add(&self, mut entity: E) -> DepotResult<E> {
        let mut rows = self.write()?;
        if entity.id().is_unassigned() {
            entity.set_id(EntityId::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
        } else {
            if rows.contains_key(&entity.id()) {
                return Err(DepotError::persistence(format!(
                    "{} with id {} already stored",
                    E::KIND,
                    entity.id()
                )));
            }
            // Keep generated ids ahead of explicitly assigned ones.
            self.next_id
                .fetch_max(entity.id().raw() + 1, Ordering::SeqCst);
        }
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    fn modify(&self, entity: E) -> DepotResult<()> {
        let mut rows = self.write()?;
        if !rows.contains_key(&entity.id()) {
            return Err(DepotError::not_found(E::KIND, entity.id()));
        }
        rows.insert(entity.id(), entity);
        Ok(())
    }

    fn remove(&self, id: EntityId) -> DepotResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }
}

// The in-memory store never actually suspends; the async surface exists so it
// can stand in for async backends in tests and wiring.
#[async_trait]
impl<E: Entity> AsyncRepository<E> for InMemoryRepository<E> {
    async fn get_all(&self) -> DepotResult<Vec<E>> {
        Repository::get_all(self)
    }

    async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Repository::find(self, id)
    }

    async fn exists(&self, id: EntityId) -> DepotResult<bool> {
        Repository::exists(self, id)
    }

    async fn query(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
    ) -> DepotResult<Vec<E>> {
        Repository::query(self, predicate)
    }

    async fn add(&self, entity: E) -> DepotResult<E> {
        Repository::add(self, entity)
    }

    async fn modify(&self, entity: E) -> DepotResult<()> {
        Repository::modify(self, entity)
    }

    async fn remove(&self, id: EntityId) -> DepotResult<bool> {
        Repository::remove(self, id)
    }
}
