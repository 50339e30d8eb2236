//! Type-keyed lookup capabilities: the resolve pass's only storage surface.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use depot_core::{DepotError, DepotResult, Entity, EntityId};

/// Find-by-id capability for one entity type.
pub trait Lookup<E: Entity>: Send + Sync {
    fn find(&self, id: EntityId) -> DepotResult<Option<E>>;
}

impl<E: Entity> core::fmt::Debug for dyn Lookup<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lookup").field("kind", &E::KIND).finish()
    }
}

/// Async find-by-id capability for backends whose lookup suspends
/// (network/database bound).
#[async_trait]
pub trait AsyncLookup<E: Entity>: Send + Sync {
    async fn find(&self, id: EntityId) -> DepotResult<Option<E>>;
}

/// Closure-backed lookup capability; handy for tests and small wiring.
pub struct FnLookup<F>(pub F);

impl<E, F> Lookup<E> for FnLookup<F>
where
    E: Entity,
    F: Fn(EntityId) -> DepotResult<Option<E>> + Send + Sync,
{
    fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        (self.0)(id)
    }
}

struct Entry {
    kind: &'static str,
    capability: Box<dyn Any + Send + Sync>,
}

/// Registry handing out lookup capabilities keyed by entity type.
///
/// This is the dynamic-dispatch seam for reference fields whose concrete type
/// is only known at the traversal site: entries are keyed by `TypeId` and
/// downcast back to their typed capability on the way out. Asking for a type
/// that was never registered is a [`DepotError::MissingLookup`], surfaced to
/// the caller rather than swallowed.
#[derive(Default)]
pub struct LookupRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl LookupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: Entity>(&mut self, lookup: Arc<dyn Lookup<E>>) {
        self.entries.insert(
            TypeId::of::<E>(),
            Entry {
                kind: E::KIND,
                capability: Box::new(lookup),
            },
        );
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<E: Entity>(mut self, lookup: Arc<dyn Lookup<E>>) -> Self {
        self.register(lookup);
        self
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<E>())
    }

    /// The capability registered for `E`.
    pub fn get<E: Entity>(&self) -> DepotResult<Arc<dyn Lookup<E>>> {
        self.entries
            .get(&TypeId::of::<E>())
            .and_then(|entry| entry.capability.downcast_ref::<Arc<dyn Lookup<E>>>())
            .cloned()
            .ok_or(DepotError::MissingLookup { kind: E::KIND })
    }
}

impl core::fmt::Debug for LookupRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kinds: Vec<&str> = self.entries.values().map(|e| e.kind).collect();
        kinds.sort_unstable();
        f.debug_struct("LookupRegistry").field("kinds", &kinds).finish()
    }
}

/// Async counterpart of [`LookupRegistry`].
#[derive(Default)]
pub struct AsyncLookupRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl AsyncLookupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: Entity>(&mut self, lookup: Arc<dyn AsyncLookup<E>>) {
        self.entries.insert(
            TypeId::of::<E>(),
            Entry {
                kind: E::KIND,
                capability: Box::new(lookup),
            },
        );
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<E: Entity>(mut self, lookup: Arc<dyn AsyncLookup<E>>) -> Self {
        self.register(lookup);
        self
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<E>())
    }

    /// The capability registered for `E`.
    pub fn get<E: Entity>(&self) -> DepotResult<Arc<dyn AsyncLookup<E>>> {
        self.entries
            .get(&TypeId::of::<E>())
            .and_then(|entry| entry.capability.downcast_ref::<Arc<dyn AsyncLookup<E>>>())
            .cloned()
            .ok_or(DepotError::MissingLookup { kind: E::KIND })
    }
}

impl core::fmt::Debug for AsyncLookupRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kinds: Vec<&str> = self.entries.values().map(|e| e.kind).collect();
        kinds.sort_unstable();
        f.debug_struct("AsyncLookupRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}
