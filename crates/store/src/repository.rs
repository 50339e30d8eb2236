//! Storage backend abstraction: a keyed collection per entity type.
//!
//! ## Design principles
//!
//! - **No storage assumptions**: works for in-memory implementations
//!   (tests/dev) and database-backed ones (production).
//! - **Opaque locking**: each backend owns its own locking discipline; the
//!   traits expose none of it.
//! - **Typed failures**: referential-integrity misses surface as
//!   [`DepotError::NotFound`], storage faults as
//!   [`DepotError::Persistence`]; neither is retried here.

use std::sync::Arc;

use async_trait::async_trait;

use depot_core::{DepotResult, Entity, EntityId};
use depot_engine::{AsyncLookup, Lookup};

/// Keyed storage for one entity type.
pub trait Repository<E: Entity>: Send + Sync {
    /// All stored entities, ascending id order.
    fn get_all(&self) -> DepotResult<Vec<E>>;

    fn find(&self, id: EntityId) -> DepotResult<Option<E>>;

    fn exists(&self, id: EntityId) -> DepotResult<bool>;

    /// Stored entities matching `predicate`, ascending id order.
    fn query(&self, predicate: &(dyn Fn(&E) -> bool + Send + Sync)) -> DepotResult<Vec<E>>;

    /// Store a new entity, assigning an id when the input is unassigned.
    /// Returns the stored value (with its id).
    fn add(&self, entity: E) -> DepotResult<E>;

    /// Replace the stored entity with the same id; `NotFound` if absent.
    fn modify(&self, entity: E) -> DepotResult<()>;

    /// Remove by id; reports whether anything was removed.
    fn remove(&self, id: EntityId) -> DepotResult<bool>;
}

/// Async counterpart of [`Repository`] for backends whose operations suspend.
#[async_trait]
pub trait AsyncRepository<E: Entity>: Send + Sync {
    async fn get_all(&self) -> DepotResult<Vec<E>>;

    async fn find(&self, id: EntityId) -> DepotResult<Option<E>>;

    async fn exists(&self, id: EntityId) -> DepotResult<bool>;

    async fn query(&self, predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync))
    -> DepotResult<Vec<E>>;

    async fn add(&self, entity: E) -> DepotResult<E>;

    async fn modify(&self, entity: E) -> DepotResult<()>;

    async fn remove(&self, id: EntityId) -> DepotResult<bool>;
}

impl<E, S> Repository<E> for Arc<S>
where
    E: Entity,
    S: Repository<E> + ?Sized,
{
    fn get_all(&self) -> DepotResult<Vec<E>> {
        (**self).get_all()
    }

    fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        (**self).find(id)
    }

    fn exists(&self, id: EntityId) -> DepotResult<bool> {
        (**self).exists(id)
    }

    fn query(&self, predicate: &(dyn Fn(&E) -> bool + Send + Sync)) -> DepotResult<Vec<E>> {
        (**self).query(predicate)
    }

    fn add(&self, entity: E) -> DepotResult<E> {
        (**self).add(entity)
    }

    fn modify(&self, entity: E) -> DepotResult<()> {
        (**self).modify(entity)
    }

    fn remove(&self, id: EntityId) -> DepotResult<bool> {
        (**self).remove(id)
    }
}

#[async_trait]
impl<E, S> AsyncRepository<E> for Arc<S>
where
    E: Entity,
    S: AsyncRepository<E> + ?Sized,
{
    async fn get_all(&self) -> DepotResult<Vec<E>> {
        (**self).get_all().await
    }

    async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        (**self).find(id).await
    }

    async fn exists(&self, id: EntityId) -> DepotResult<bool> {
        (**self).exists(id).await
    }

    async fn query(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
    ) -> DepotResult<Vec<E>> {
        (**self).query(predicate).await
    }

    async fn add(&self, entity: E) -> DepotResult<E> {
        (**self).add(entity).await
    }

    async fn modify(&self, entity: E) -> DepotResult<()> {
        (**self).modify(entity).await
    }

    async fn remove(&self, id: EntityId) -> DepotResult<bool> {
        (**self).remove(id).await
    }
}

/// Adapter exposing a repository as a resolve-time lookup capability, so a
/// lookup registry can be populated straight from backends.
pub struct RepositoryLookup<R>(Arc<R>);

impl<R> RepositoryLookup<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self(repository)
    }
}

impl<E, R> Lookup<E> for RepositoryLookup<R>
where
    E: Entity,
    R: Repository<E>,
{
    fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Repository::find(self.0.as_ref(), id)
    }
}

#[async_trait]
impl<E, R> AsyncLookup<E> for RepositoryLookup<R>
where
    E: Entity,
    R: AsyncRepository<E>,
{
    async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        AsyncRepository::find(self.0.as_ref(), id).await
    }
}
