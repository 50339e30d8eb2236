//! Entity trait: identity + optional display name.

use crate::id::EntityId;

/// Minimal interface every domain entity implements.
///
/// Identity is the sole equality key for entities: two values of the same
/// concrete type with equal assigned ids denote the same entity, regardless
/// of their other field contents. `Default` provides the "empty" instance the
/// engine starts from when it builds stubs.
pub trait Entity: Clone + Default + Send + Sync + 'static {
    /// Stable type name, used in error reporting and logging.
    const KIND: &'static str;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Human-readable label carried into stubs, if the type has one.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Counterpart setter; unnamed types leave this a no-op.
    fn set_display_name(&mut self, _name: String) {}
}

/// Identity-based entity equality: same concrete type, same assigned id.
///
/// Unassigned entities are never equal by identity (there is no identity to
/// compare yet).
pub fn same_identity<E: Entity>(a: &E, b: &E) -> bool {
    !a.id().is_unassigned() && a.id() == b.id()
}
