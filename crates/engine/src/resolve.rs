//! Stub-to-entity resolution through a lookup capability.

use tracing::debug;

use depot_core::{DepotError, DepotResult, Entity};

use crate::lookup::Lookup;

/// Replace `stub` with the fully loaded entity behind its id.
///
/// Unassigned stubs come back unchanged (there is no identity to resolve). A
/// lookup miss is a hard failure carrying the requested type and id; it is
/// never swallowed on the way up.
pub fn resolve_stub<E: Entity>(stub: &E, lookup: &dyn Lookup<E>) -> DepotResult<E> {
    if stub.id().is_unassigned() {
        return Ok(stub.clone());
    }

    match lookup.find(stub.id())? {
        Some(entity) => Ok(entity),
        None => {
            debug!(kind = E::KIND, id = %stub.id(), "reference target missing");
            Err(DepotError::not_found(E::KIND, stub.id()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::FnLookup;
    use crate::testutil::Tag;
    use depot_core::EntityId;

    fn full_tag() -> Tag {
        Tag {
            id: EntityId::new(5),
            label: "infra".to_string(),
            color: "orange".to_string(),
        }
    }

    #[test]
    fn resolves_stub_to_full_entity() {
        let lookup = FnLookup(|id: EntityId| -> DepotResult<Option<Tag>> {
            Ok((id == EntityId::new(5)).then(full_tag))
        });

        let stub = Tag {
            id: EntityId::new(5),
            label: "infra".to_string(),
            color: String::new(),
        };
        let resolved = resolve_stub(&stub, &lookup).unwrap();
        assert_eq!(resolved, full_tag());
    }

    #[test]
    fn unassigned_stub_is_returned_unchanged() {
        let lookup = FnLookup(|_: EntityId| -> DepotResult<Option<Tag>> {
            panic!("lookup must not be consulted for unassigned ids")
        });

        let stub = Tag::default();
        let resolved = resolve_stub(&stub, &lookup).unwrap();
        assert_eq!(resolved, stub);
    }

    #[test]
    fn miss_surfaces_not_found_with_kind_and_id() {
        let lookup = FnLookup(|_: EntityId| -> DepotResult<Option<Tag>> { Ok(None) });

        let stub = Tag {
            id: EntityId::new(77),
            ..Tag::default()
        };
        let err = resolve_stub(&stub, &lookup).unwrap_err();
        assert_eq!(err, DepotError::not_found("Tag", EntityId::new(77)));
    }

    #[test]
    fn backend_failure_propagates_unchanged() {
        let lookup = FnLookup(|_: EntityId| -> DepotResult<Option<Tag>> {
            Err(DepotError::persistence("connection reset"))
        });

        let stub = Tag {
            id: EntityId::new(1),
            ..Tag::default()
        };
        let err = resolve_stub(&stub, &lookup).unwrap_err();
        assert_eq!(err, DepotError::persistence("connection reset"));
    }
}
