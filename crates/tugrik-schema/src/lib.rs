//! Typed schema interface for Tugrik.
//!
//! Rather than discovering fields through runtime reflection, this crate
//! makes the schema an explicit, compile-time contract: a
//! composite type implements [`Entity`] to expose its field descriptor list
//! (names in declared order, a getter, a setter) and its identity trailer
//! fields. Field values are the closed [`FieldValue`] variant — scalar,
//! sequence, or composite — consumed uniformly by the flattener and the
//! rebuilder.
//!
//! Rebuilding needs to instantiate composites from their type name alone, so
//! every type that can appear in a stored document is registered in a
//! [`SchemaRegistry`] with a zero-argument constructor.

pub mod entity;
pub mod error;
pub mod registry;
pub mod value;

pub use entity::{borrow_as, borrow_as_mut, entity_ref, Entity, EntityRef, Identity};
pub use error::SchemaError;
pub use registry::SchemaRegistry;
pub use value::{FieldValue, Scalar};
