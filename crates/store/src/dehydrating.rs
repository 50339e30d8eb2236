//! Dehydrating/resolving repository decorators.
//!
//! Wrapping a backend here makes the graph rewrite transparent: every entity
//! leaving the backend is dehydrated, every entity entering it (`add`,
//! `modify`) is resolved first. Callers never see fully hydrated graphs, and
//! backends never see stubs.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use depot_core::{DepotResult, EntityId};
use depot_engine::{
    AsyncLookupRegistry, Cancellation, Describe, LookupRegistry, dehydrate, resolve,
    resolve_async,
};

use crate::repository::{AsyncRepository, Repository};

/// Decorator piping every read through dehydration and every write through
/// resolution.
pub struct Dehydrating<E: Describe, R> {
    inner: R,
    lookups: Arc<LookupRegistry>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Describe, R: Repository<E>> Dehydrating<E, R> {
    pub fn new(inner: R, lookups: Arc<LookupRegistry>) -> Self {
        Self {
            inner,
            lookups,
            _entity: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<E: Describe, R: Repository<E>> Repository<E> for Dehydrating<E, R> {
    fn get_all(&self) -> DepotResult<Vec<E>> {
        Ok(self.inner.get_all()?.iter().map(dehydrate).collect())
    }

    fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Ok(self.inner.find(id)?.map(|e| dehydrate(&e)))
    }

    fn exists(&self, id: EntityId) -> DepotResult<bool> {
        self.inner.exists(id)
    }

    fn query(&self, predicate: &(dyn Fn(&E) -> bool + Send + Sync)) -> DepotResult<Vec<E>> {
        Ok(self.inner.query(predicate)?.iter().map(dehydrate).collect())
    }

    fn add(&self, entity: E) -> DepotResult<E> {
        let resolved = resolve(&entity, &self.lookups)?;
        let stored = self.inner.add(resolved)?;
        debug!(kind = E::KIND, id = %stored.id(), "entity added");
        // Callers get the lean shape back, id assigned.
        Ok(dehydrate(&stored))
    }

    fn modify(&self, entity: E) -> DepotResult<()> {
        let resolved = resolve(&entity, &self.lookups)?;
        self.inner.modify(resolved)
    }

    fn remove(&self, id: EntityId) -> DepotResult<bool> {
        self.inner.remove(id)
    }
}

/// Async counterpart of [`Dehydrating`].
///
/// Resolution on the write path suspends per referenced entity; the attached
/// cancellation signal aborts in-flight rewrites. Reads dehydrate
/// synchronously (dehydration is pure and never suspends).
pub struct AsyncDehydrating<E: Describe, R> {
    inner: R,
    lookups: Arc<AsyncLookupRegistry>,
    cancel: Cancellation,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Describe, R: AsyncRepository<E>> AsyncDehydrating<E, R> {
    pub fn new(inner: R, lookups: Arc<AsyncLookupRegistry>) -> Self {
        Self {
            inner,
            lookups,
            cancel: Cancellation::new(),
            _entity: PhantomData,
        }
    }

    /// Attach an externally owned cancellation signal.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<E: Describe, R: AsyncRepository<E>> AsyncRepository<E> for AsyncDehydrating<E, R> {
    async fn get_all(&self) -> DepotResult<Vec<E>> {
        Ok(self.inner.get_all().await?.iter().map(dehydrate).collect())
    }

    async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Ok(self.inner.find(id).await?.map(|e| dehydrate(&e)))
    }

    async fn exists(&self, id: EntityId) -> DepotResult<bool> {
        self.inner.exists(id).await
    }

    async fn query(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
    ) -> DepotResult<Vec<E>> {
        Ok(self
            .inner
            .query(predicate)
            .await?
            .iter()
            .map(dehydrate)
            .collect())
    }

    async fn add(&self, entity: E) -> DepotResult<E> {
        let resolved = resolve_async(&entity, &self.lookups, &self.cancel).await?;
        let stored = self.inner.add(resolved).await?;
        debug!(kind = E::KIND, id = %stored.id(), "entity added");
        Ok(dehydrate(&stored))
    }

    async fn modify(&self, entity: E) -> DepotResult<()> {
        let resolved = resolve_async(&entity, &self.lookups, &self.cancel).await?;
        self.inner.modify(resolved).await
    }

    async fn remove(&self, id: EntityId) -> DepotResult<bool> {
        self.inner.remove(id).await
    }
}
