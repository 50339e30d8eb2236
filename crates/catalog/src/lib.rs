//! `depot-catalog` — concrete entity types of the package catalog.
//!
//! Every annotation/cardinality combination the engine supports appears here:
//! single references (`Package::maintainer`), self-referential reference
//! collections (`Package::dependencies`), and embedded compositions with
//! references of their own (`Package::releases` → `Release::published_by`).

pub mod maintainer;
pub mod package;
pub mod release;

pub use maintainer::Maintainer;
pub use package::Package;
pub use release::Release;
