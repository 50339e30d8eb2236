//! Per-type field metadata: the only type-introspection surface the engine
//! needs.
//!
//! Each entity type declares, once, which of its fields are plain data,
//! identity references, or embedded compositions. The declaration lives in a
//! `static` table, so the "computed once per type, stable for the process
//! lifetime" contract is discharged at compile time and reads are trivially
//! thread-safe.

use core::future::Future;

use depot_core::{DepotResult, Entity};

use crate::rewrite::{AsyncResolvePass, Pass};

/// How a field participates in graph rewriting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Copied verbatim, never recursed into.
    Plain,
    /// Identity link to another entity: stub on dehydrate, look up on resolve.
    Reference,
    /// Owned composition: recurse into the target's own schema instead of
    /// stubbing or resolving the value directly.
    Embed,
}

/// Whether a field holds one target or a collection of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Collection,
}

/// Sync rewrite thunk for one annotated field of `T`.
pub type FieldRewrite<T> = fn(&T, &mut T, &Pass<'_>) -> DepotResult<()>;

/// Future returned by an async field rewrite thunk.
pub type AsyncFieldFuture<'a> =
    core::pin::Pin<Box<dyn Future<Output = DepotResult<()>> + Send + 'a>>;

/// Async (resolve-only) rewrite thunk for one annotated field of `T`.
pub type FieldRewriteAsync<T> =
    for<'a> fn(&'a T, &'a mut T, &'a AsyncResolvePass<'a>) -> AsyncFieldFuture<'a>;

/// Metadata for a single field of `T`.
///
/// The thunks are monomorphized per field at declaration time (by the
/// [`schema!`](crate::schema!) macro), which is how the engine walks arbitrary
/// shapes without reflection. Plain fields carry no thunks: the rewriter's
/// initial clone already copied them verbatim.
pub struct FieldSchema<T: 'static> {
    pub name: &'static str,
    pub annotation: Annotation,
    pub cardinality: Cardinality,
    pub rewrite: Option<FieldRewrite<T>>,
    pub rewrite_async: Option<FieldRewriteAsync<T>>,
}

impl<T> core::fmt::Debug for FieldSchema<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("annotation", &self.annotation)
            .field("cardinality", &self.cardinality)
            .finish()
    }
}

/// Field metadata table for one entity type.
pub struct TypeSchema<T: 'static> {
    pub type_name: &'static str,
    pub fields: &'static [FieldSchema<T>],
}

impl<T> TypeSchema<T> {
    pub fn field(&self, name: &str) -> Option<&FieldSchema<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that take part in rewriting (reference or embed).
    pub fn annotated(&self) -> impl Iterator<Item = &FieldSchema<T>> {
        self.fields
            .iter()
            .filter(|f| f.annotation != Annotation::Plain)
    }
}

impl<T> core::fmt::Debug for TypeSchema<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// An entity type that declares its rewrite schema.
///
/// Implement through the [`schema!`](crate::schema!) macro rather than by
/// hand; the macro keeps the metadata table and the per-field thunks in sync.
pub trait Describe: Entity {
    fn schema() -> &'static TypeSchema<Self>;
}
