//! Entity identifier: an integer key with an "unassigned" sentinel.

use serde::{Deserialize, Serialize};

/// Identifier of a persisted entity.
///
/// `0` is the sentinel for "not yet assigned / not persisted". Backends hand
/// out real ids on `add`; the engine treats unassigned entities as terminal
/// (nothing to stub, nothing to resolve).
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Sentinel for entities that have not been persisted yet.
    pub const UNASSIGNED: EntityId = EntityId(0);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whether this id is the "not yet persisted" sentinel.
    pub const fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for EntityId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}
