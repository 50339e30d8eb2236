//! Shared test fixtures: a small entity family covering every annotation and
//! cardinality combination, including a self-referential collection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use depot_core::{DepotResult, Entity, EntityId};

use crate::lookup::{AsyncLookup, FnLookup, Lookup};

/// Named leaf entity with no references of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub id: EntityId,
    pub label: String,
    pub color: String,
}

impl Entity for Tag {
    const KIND: &'static str = "Tag";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn display_name(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn set_display_name(&mut self, name: String) {
        self.label = name;
    }
}

crate::schema! {
    Tag {
        plain id,
        plain label,
        plain color,
    }
}

/// Unnamed entity used as an embed target; carries a reference of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub id: EntityId,
    pub file_name: String,
    pub uploaded_by: Option<Tag>,
}

impl Entity for Attachment {
    const KIND: &'static str = "Attachment";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

crate::schema! {
    Attachment {
        plain id,
        plain file_name,
        reference uploaded_by,
    }
}

/// Root entity exercising every annotation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    pub body: String,
    pub author: Option<Tag>,
    pub related: Vec<Note>,
    pub cover: Option<Attachment>,
    pub attachments: Vec<Attachment>,
}

impl Entity for Note {
    const KIND: &'static str = "Note";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn display_name(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn set_display_name(&mut self, name: String) {
        self.title = name;
    }
}

crate::schema! {
    Note {
        plain id,
        plain title,
        plain body,
        reference author,
        references related,
        embed cover,
        embeds attachments,
    }
}

/// Sync lookup over a fixed set of entities.
pub fn map_lookup<E: Entity>(entities: Vec<E>) -> Arc<dyn Lookup<E>> {
    let map: HashMap<EntityId, E> = entities.into_iter().map(|e| (e.id(), e)).collect();
    Arc::new(FnLookup(move |id: EntityId| -> DepotResult<Option<E>> {
        Ok(map.get(&id).cloned())
    }))
}

struct MapAsyncLookup<E> {
    map: HashMap<EntityId, E>,
}

#[async_trait]
impl<E: Entity> AsyncLookup<E> for MapAsyncLookup<E> {
    async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
        Ok(self.map.get(&id).cloned())
    }
}

/// Async lookup over a fixed set of entities.
pub fn map_async_lookup<E: Entity>(entities: Vec<E>) -> Arc<dyn AsyncLookup<E>> {
    let map: HashMap<EntityId, E> = entities.into_iter().map(|e| (e.id(), e)).collect();
    Arc::new(MapAsyncLookup { map })
}
