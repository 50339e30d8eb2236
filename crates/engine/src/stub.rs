//! Identity stub construction.

use depot_core::Entity;

/// Reduce `entity` to its identity stub.
///
/// The stub is a fresh default instance carrying only the source's id and,
/// for named types, its display name. Every other field stays at its type's
/// default.
///
/// Unassigned entities come back unchanged: a value that was never persisted
/// has no identity to stand in for, so there is nothing meaningful to strip.
pub fn stub_of<E: Entity>(entity: &E) -> E {
    if entity.id().is_unassigned() {
        return entity.clone();
    }

    let mut stub = E::default();
    stub.set_id(entity.id());
    if let Some(name) = entity.display_name() {
        stub.set_display_name(name.to_string());
    }
    stub
}
