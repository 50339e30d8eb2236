//! `depot-engine` — schema-driven dehydration/resolution of entity graphs.
//!
//! Given per-field annotations (`Reference` vs `Embed`), the engine rewrites
//! entity graphs in two directions:
//!
//! - **dehydrate**: strip every referenced entity down to an identity stub
//!   before the graph leaves the process;
//! - **resolve**: replace identity stubs with fully loaded entities through a
//!   pluggable lookup capability (sync or async).
//!
//! Rewrites are pure: the input graph is never mutated; a new value is built.
//! Entity types declare their schema once with the [`schema!`] macro; the
//! resulting `static` tables are the engine's only type-introspection surface.

pub mod cancel;
pub mod lookup;
mod macros;
pub mod resolve;
pub mod rewrite;
pub mod schema;
pub mod stub;

pub use cancel::Cancellation;
pub use lookup::{AsyncLookup, AsyncLookupRegistry, FnLookup, Lookup, LookupRegistry};
pub use resolve::resolve_stub;
pub use rewrite::{AsyncResolvePass, Pass, dehydrate, resolve, resolve_async};
pub use schema::{Annotation, Cardinality, Describe, FieldSchema, TypeSchema};
pub use stub::stub_of;

// Re-exported so macro-generated code can reach them through `$crate`.
pub use depot_core::{DepotError, DepotResult, Entity, EntityId};

#[cfg(test)]
pub(crate) mod testutil;
