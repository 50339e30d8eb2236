//! The graph rewriter: a schema-driven structural copy with per-field
//! operations.
//!
//! A pass visits every field listed in the root type's schema and produces a
//! **new** value; the source graph is never mutated. Plain fields ride along
//! on the initial clone; annotated fields are overwritten by their thunks.
//! Self-referential fields need no special handling: recursion depth is
//! bounded by the actual graph's depth.

use tracing::trace;

use depot_core::{DepotError, DepotResult, Entity};

use crate::cancel::Cancellation;
use crate::lookup::{AsyncLookupRegistry, LookupRegistry};
use crate::resolve::resolve_stub;
use crate::schema::Describe;
use crate::stub::stub_of;

/// One synchronous rewriting operation over an entity graph.
#[derive(Copy, Clone)]
pub enum Pass<'a> {
    /// Strip referenced entities down to identity stubs.
    Dehydrate,
    /// Replace identity stubs with fully loaded entities.
    Resolve { lookups: &'a LookupRegistry },
}

impl Pass<'_> {
    /// Rewrite one entity according to this pass.
    pub fn rewrite<E: Describe>(&self, source: &E) -> DepotResult<E> {
        if matches!(self, Pass::Dehydrate) && source.id().is_unassigned() {
            // A graph that was never persisted carries no redundancy to
            // strip; hand it back as-is, references included.
            return Ok(source.clone());
        }

        let schema = E::schema();
        let mut out = source.clone();
        for field in schema.fields {
            if let Some(rewrite) = field.rewrite {
                trace!(entity = schema.type_name, field = field.name, "rewrite field");
                rewrite(source, &mut out, self)?;
            }
        }
        Ok(out)
    }

    fn element<E: Entity>(&self, value: &E) -> DepotResult<E> {
        match self {
            Pass::Dehydrate => Ok(stub_of(value)),
            Pass::Resolve { lookups } => {
                let lookup = lookups.get::<E>()?;
                resolve_stub(value, lookup.as_ref())
            }
        }
    }

    /// Single `Reference` field: absent stays absent.
    pub fn single<E: Entity>(&self, value: &Option<E>) -> DepotResult<Option<E>> {
        value.as_ref().map(|v| self.element(v)).transpose()
    }

    /// `Reference` collection: per-element rule, source order preserved.
    pub fn collection<E: Entity>(&self, values: &[E]) -> DepotResult<Vec<E>> {
        values.iter().map(|v| self.element(v)).collect()
    }

    /// Single `Embed` field: recurse into the target's own schema.
    pub fn embedded<E: Describe>(&self, value: &Option<E>) -> DepotResult<Option<E>> {
        value.as_ref().map(|v| self.rewrite(v)).transpose()
    }

    /// `Embed` collection: recurse per element, source order preserved.
    pub fn embedded_collection<E: Describe>(&self, values: &[E]) -> DepotResult<Vec<E>> {
        values.iter().map(|v| self.rewrite(v)).collect()
    }
}

/// Asynchronous resolve pass for lookup backends that suspend.
///
/// Dehydration is pure and stays synchronous; only resolution can block on a
/// backend. Fields are awaited sequentially in declaration order, keeping
/// backend call ordering predictable and bounding concurrent load.
/// Cancellation is honored at every suspension point: a fired signal aborts
/// the whole rewrite and the partially built value is dropped, never
/// returned.
pub struct AsyncResolvePass<'a> {
    lookups: &'a AsyncLookupRegistry,
    cancel: &'a Cancellation,
}

impl<'a> AsyncResolvePass<'a> {
    pub fn new(lookups: &'a AsyncLookupRegistry, cancel: &'a Cancellation) -> Self {
        Self { lookups, cancel }
    }

    /// Rewrite one entity, awaiting each annotated field in turn.
    pub async fn rewrite<E: Describe>(&self, source: &E) -> DepotResult<E> {
        let schema = E::schema();
        let mut out = source.clone();
        for field in schema.fields {
            if let Some(rewrite) = field.rewrite_async {
                self.cancel.guard()?;
                trace!(entity = schema.type_name, field = field.name, "rewrite field");
                rewrite(source, &mut out, self).await?;
            }
        }
        Ok(out)
    }

    async fn element<E: Entity>(&self, value: &E) -> DepotResult<E> {
        if value.id().is_unassigned() {
            return Ok(value.clone());
        }

        let lookup = self.lookups.get::<E>()?;
        let found = tokio::select! {
            _ = self.cancel.cancelled() => return Err(DepotError::Cancelled),
            found = lookup.find(value.id()) => found?,
        };
        found.ok_or(DepotError::NotFound {
            kind: E::KIND,
            id: value.id(),
        })
    }

    /// Single `Reference` field: absent stays absent.
    pub async fn single<E: Entity>(&self, value: &Option<E>) -> DepotResult<Option<E>> {
        match value {
            None => Ok(None),
            Some(v) => Ok(Some(self.element(v).await?)),
        }
    }

    /// `Reference` collection: sequential per-element lookups, order kept.
    pub async fn collection<E: Entity>(&self, values: &[E]) -> DepotResult<Vec<E>> {
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            out.push(self.element(v).await?);
        }
        Ok(out)
    }

    /// Single `Embed` field: recurse into the target's own schema.
    pub async fn embedded<E: Describe>(&self, value: &Option<E>) -> DepotResult<Option<E>> {
        match value {
            None => Ok(None),
            Some(v) => Ok(Some(self.rewrite(v).await?)),
        }
    }

    /// `Embed` collection: recurse per element, order kept.
    pub async fn embedded_collection<E: Describe>(&self, values: &[E]) -> DepotResult<Vec<E>> {
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            out.push(self.rewrite(v).await?);
        }
        Ok(out)
    }
}

/// Produce a dehydrated copy of `entity`: every referenced entity reduced to
/// an identity stub, embedded compositions rewritten in place.
pub fn dehydrate<E: Describe>(entity: &E) -> E {
    match Pass::Dehydrate.rewrite(entity) {
        Ok(out) => out,
        // The thunk signature is fallible only for the resolve pass;
        // dehydration has no failure conditions.
        Err(err) => unreachable!("dehydrate cannot fail: {err}"),
    }
}

/// Replace every identity stub in `entity` with the fully loaded entity
/// behind it, using the registered lookup capabilities.
pub fn resolve<E: Describe>(entity: &E, lookups: &LookupRegistry) -> DepotResult<E> {
    Pass::Resolve { lookups }.rewrite(entity)
}

/// Async variant of [`resolve`] for lookup backends that suspend.
pub async fn resolve_async<E: Describe>(
    entity: &E,
    lookups: &AsyncLookupRegistry,
    cancel: &Cancellation,
) -> DepotResult<E> {
    AsyncResolvePass::new(lookups, cancel).rewrite(entity).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Annotation, Cardinality};
    use crate::testutil::{Attachment, Note, Tag, map_async_lookup, map_lookup};
    use depot_core::EntityId;

    fn author() -> Tag {
        Tag {
            id: EntityId::new(10),
            label: "alice".to_string(),
            color: "green".to_string(),
        }
    }

    fn author_stub() -> Tag {
        Tag {
            id: EntityId::new(10),
            label: "alice".to_string(),
            color: String::new(),
        }
    }

    fn related_note(id: i64, title: &str) -> Note {
        Note {
            id: EntityId::new(id),
            title: title.to_string(),
            body: format!("body of {title}"),
            ..Note::default()
        }
    }

    fn cover() -> Attachment {
        Attachment {
            id: EntityId::new(30),
            file_name: "cover.png".to_string(),
            uploaded_by: Some(author()),
        }
    }

    fn full_note() -> Note {
        Note {
            id: EntityId::new(1),
            title: "launch plan".to_string(),
            body: "the plan".to_string(),
            author: Some(author()),
            related: vec![related_note(2, "risks"), related_note(3, "rollout")],
            cover: Some(cover()),
            attachments: vec![Attachment {
                id: EntityId::new(31),
                file_name: "notes.txt".to_string(),
                uploaded_by: Some(author()),
            }],
        }
    }

    fn registry_for(note: &Note) -> LookupRegistry {
        LookupRegistry::new()
            .with::<Tag>(map_lookup(vec![author()]))
            .with::<Note>(map_lookup(note.related.clone()))
            .with::<Attachment>(map_lookup(vec![]))
    }

    fn async_registry_for(note: &Note) -> AsyncLookupRegistry {
        AsyncLookupRegistry::new()
            .with::<Tag>(map_async_lookup(vec![author()]))
            .with::<Note>(map_async_lookup(note.related.clone()))
            .with::<Attachment>(map_async_lookup(vec![]))
    }

    #[test]
    fn schema_tables_describe_fields() {
        let schema = Note::schema();
        assert_eq!(schema.type_name, "Note");
        assert_eq!(schema.fields.len(), 7);

        let author = schema.field("author").unwrap();
        assert_eq!(author.annotation, Annotation::Reference);
        assert_eq!(author.cardinality, Cardinality::Single);

        let related = schema.field("related").unwrap();
        assert_eq!(related.annotation, Annotation::Reference);
        assert_eq!(related.cardinality, Cardinality::Collection);

        let cover = schema.field("cover").unwrap();
        assert_eq!(cover.annotation, Annotation::Embed);

        let title = schema.field("title").unwrap();
        assert_eq!(title.annotation, Annotation::Plain);
        assert!(title.rewrite.is_none());

        assert_eq!(schema.annotated().count(), 4);
    }

    #[test]
    fn dehydrate_stubs_references_and_keeps_plain_fields() {
        let note = full_note();
        let lean = dehydrate(&note);

        assert_eq!(lean.id, note.id);
        assert_eq!(lean.title, "launch plan");
        assert_eq!(lean.body, "the plan");
        assert_eq!(lean.author, Some(author_stub()));
    }

    #[test]
    fn dehydrate_leaves_absent_references_absent() {
        let note = Note {
            author: None,
            cover: None,
            ..full_note()
        };

        let lean = dehydrate(&note);
        assert_eq!(lean.author, None);
        assert_eq!(lean.cover, None);
    }

    #[test]
    fn dehydrate_preserves_reference_collection_order() {
        let note = Note {
            related: vec![
                related_note(5, "five"),
                related_note(2, "two"),
                related_note(9, "nine"),
            ],
            ..full_note()
        };

        let lean = dehydrate(&note);
        let ids: Vec<i64> = lean.related.iter().map(|n| n.id.raw()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
        // Stubs, not full notes.
        assert!(lean.related.iter().all(|n| n.body.is_empty()));
        // Display names survive stubbing.
        assert_eq!(lean.related[0].title, "five");
    }

    #[test]
    fn dehydrate_rewrites_embedded_values_in_place() {
        let note = full_note();
        let lean = dehydrate(&note);

        // The embedded attachment is rewritten, not stubbed: its own plain
        // fields survive while its reference is reduced to a stub.
        let cover = lean.cover.unwrap();
        assert_eq!(cover.id, EntityId::new(30));
        assert_eq!(cover.file_name, "cover.png");
        assert_eq!(cover.uploaded_by, Some(author_stub()));

        let attachment = &lean.attachments[0];
        assert_eq!(attachment.file_name, "notes.txt");
        assert_eq!(attachment.uploaded_by, Some(author_stub()));
    }

    #[test]
    fn dehydrate_does_not_mutate_the_source() {
        let note = full_note();
        let snapshot = note.clone();
        let _ = dehydrate(&note);
        assert_eq!(note, snapshot);
    }

    #[test]
    fn dehydrate_of_unassigned_graph_is_identity() {
        let note = Note {
            id: EntityId::UNASSIGNED,
            ..full_note()
        };

        let lean = dehydrate(&note);
        assert_eq!(lean, note);
        // References stay fully hydrated, un-stubbed.
        assert_eq!(lean.author, Some(author()));
    }

    #[test]
    fn resolve_round_trips_a_dehydrated_graph() {
        let note = full_note();
        let registry = registry_for(&note);

        let lean = dehydrate(&note);
        let hydrated = resolve(&lean, &registry).unwrap();
        assert_eq!(hydrated, note);
    }

    #[test]
    fn resolve_does_not_mutate_the_source() {
        let note = full_note();
        let registry = registry_for(&note);
        let lean = dehydrate(&note);
        let snapshot = lean.clone();
        let _ = resolve(&lean, &registry).unwrap();
        assert_eq!(lean, snapshot);
    }

    #[test]
    fn resolve_surfaces_not_found_with_kind_and_id() {
        let mut note = full_note();
        note.related.push(related_note(99, "ghost"));
        let registry = registry_for(&full_note());

        let lean = dehydrate(&note);
        let err = resolve(&lean, &registry).unwrap_err();
        assert_eq!(err, DepotError::not_found("Note", EntityId::new(99)));
    }

    #[test]
    fn resolve_without_registered_lookup_is_missing_lookup() {
        let note = full_note();
        let registry = LookupRegistry::new().with::<Tag>(map_lookup(vec![author()]));

        let lean = dehydrate(&note);
        let err = resolve(&lean, &registry).unwrap_err();
        assert_eq!(err, DepotError::missing_lookup("Note"));
    }

    #[test]
    fn resolve_leaves_unassigned_references_untouched() {
        let draft_author = Tag {
            id: EntityId::UNASSIGNED,
            label: "pending".to_string(),
            color: "grey".to_string(),
        };
        let note = Note {
            author: Some(draft_author.clone()),
            related: vec![],
            cover: None,
            attachments: vec![],
            ..full_note()
        };
        let registry = LookupRegistry::new().with::<Tag>(map_lookup(vec![]));

        let hydrated = resolve(&note, &registry).unwrap();
        assert_eq!(hydrated.author, Some(draft_author));
    }

    #[tokio::test]
    async fn resolve_async_round_trips_a_dehydrated_graph() {
        let note = full_note();
        let registry = async_registry_for(&note);

        let lean = dehydrate(&note);
        let hydrated = resolve_async(&lean, &registry, &Cancellation::new())
            .await
            .unwrap();
        assert_eq!(hydrated, note);
    }

    #[tokio::test]
    async fn resolve_async_surfaces_not_found() {
        let mut note = full_note();
        note.related.push(related_note(404, "missing"));
        let registry = async_registry_for(&full_note());

        let lean = dehydrate(&note);
        let err = resolve_async(&lean, &registry, &Cancellation::new())
            .await
            .unwrap_err();
        assert_eq!(err, DepotError::not_found("Note", EntityId::new(404)));
    }

    #[tokio::test]
    async fn resolve_async_awaits_lookups_in_declaration_and_source_order() {
        use crate::lookup::AsyncLookup;
        use async_trait::async_trait;
        use depot_core::DepotResult;
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        struct Recording<E: Entity> {
            entities: HashMap<EntityId, E>,
            log: Arc<Mutex<Vec<(&'static str, i64)>>>,
        }

        #[async_trait]
        impl<E: Entity> AsyncLookup<E> for Recording<E> {
            async fn find(&self, id: EntityId) -> DepotResult<Option<E>> {
                self.log.lock().unwrap().push((E::KIND, id.raw()));
                Ok(self.entities.get(&id).cloned())
            }
        }

        fn recording<E: Entity>(
            entities: Vec<E>,
            log: &Arc<Mutex<Vec<(&'static str, i64)>>>,
        ) -> Arc<dyn AsyncLookup<E>> {
            Arc::new(Recording {
                entities: entities.into_iter().map(|e| (e.id(), e)).collect(),
                log: log.clone(),
            })
        }

        let note = Note {
            related: vec![
                related_note(5, "five"),
                related_note(2, "two"),
                related_note(9, "nine"),
            ],
            ..full_note()
        };
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = AsyncLookupRegistry::new()
            .with::<Tag>(recording(vec![author()], &log))
            .with::<Note>(recording(note.related.clone(), &log));

        let lean = dehydrate(&note);
        let hydrated = resolve_async(&lean, &registry, &Cancellation::new())
            .await
            .unwrap();
        assert_eq!(hydrated, note);

        // One backend call per reference, strictly in field declaration order
        // (author, related, cover, attachments), with collections visited in
        // source order. Embedded values contribute their own references at
        // the point they are recursed into.
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("Tag", 10),  // author
                ("Note", 5),  // related, source order
                ("Note", 2),
                ("Note", 9),
                ("Tag", 10),  // cover.uploaded_by
                ("Tag", 10),  // attachments[0].uploaded_by
            ]
        );
    }

    #[tokio::test]
    async fn resolve_async_aborts_when_already_cancelled() {
        let note = full_note();
        let registry = async_registry_for(&note);
        let cancel = Cancellation::new();
        cancel.cancel();

        let lean = dehydrate(&note);
        let err = resolve_async(&lean, &registry, &cancel).await.unwrap_err();
        assert_eq!(err, DepotError::Cancelled);
    }

    #[tokio::test]
    async fn resolve_async_aborts_mid_traversal() {
        use crate::lookup::AsyncLookup;
        use async_trait::async_trait;
        use depot_core::DepotResult;

        // A lookup that fires the cancellation signal and then never
        // completes; the rewrite must surface `Cancelled`, not hang.
        struct Stall {
            cancel: Cancellation,
        }

        #[async_trait]
        impl AsyncLookup<Tag> for Stall {
            async fn find(&self, _id: EntityId) -> DepotResult<Option<Tag>> {
                self.cancel.cancel();
                std::future::pending().await
            }
        }

        let cancel = Cancellation::new();
        let registry = AsyncLookupRegistry::new()
            .with::<Tag>(std::sync::Arc::new(Stall {
                cancel: cancel.clone(),
            }))
            .with::<Note>(map_async_lookup(vec![]))
            .with::<Attachment>(map_async_lookup(vec![]));

        let note = Note {
            related: vec![],
            cover: None,
            attachments: vec![],
            ..full_note()
        };
        let lean = dehydrate(&note);
        let err = resolve_async(&lean, &registry, &cancel).await.unwrap_err();
        assert_eq!(err, DepotError::Cancelled);
    }
}
