//! `depot-core` — entity identity and the shared error taxonomy.
//!
//! This crate contains the **pure domain** primitives the rest of the
//! workspace builds on (no storage or traversal concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, same_identity};
pub use error::{DepotError, DepotResult};
pub use id::EntityId;
