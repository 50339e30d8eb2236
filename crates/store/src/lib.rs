//! `depot-store` — storage abstraction and the dehydrating decorators.
//!
//! The engine only ever sees storage through the keyed-lookup surface defined
//! here. [`Dehydrating`](dehydrating::Dehydrating) and
//! [`AsyncDehydrating`](dehydrating::AsyncDehydrating) wrap any backend so
//! that every entity leaving it is dehydrated and every entity entering it is
//! resolved first.

pub mod dehydrating;
pub mod in_memory;
pub mod repository;

pub use dehydrating::{AsyncDehydrating, Dehydrating};
pub use in_memory::InMemoryRepository;
pub use repository::{AsyncRepository, Repository, RepositoryLookup};
