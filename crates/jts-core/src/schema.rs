//! The Table Schema document produced by an introspection run.
//!
//! Ownership is strictly tree shaped: a [`Database`] owns its
//! [`Datapackage`]s, which own their [`Resource`]s, which own their fields,
//! indexes and keys. Foreign keys point at their targets by name.

mod database;
pub use database::Database;

mod datapackage;
pub use datapackage::Datapackage;

mod field;
pub use field::{Field, FieldConstraints};

mod fk;
pub use fk::{Cardinality, ForeignKey, Reference};

mod index;
pub use index::Index;

mod resource;
pub use resource::{Resource, ResourceKind};

mod ty;
pub use ty::FieldType;

mod unique;
pub use unique::UniqueConstraint;

mod verify;
