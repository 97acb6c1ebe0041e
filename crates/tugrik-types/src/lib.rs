//! Foundation types for Tugrik.
//!
//! This crate provides the identifier, hashing, and document types used
//! throughout the Tugrik object-document mapper. Every other Tugrik crate
//! depends on `tugrik-types`.
//!
//! # Key Types
//!
//! - [`Oid`] — Type-scoped object identifier (`TypeName::token`)
//! - [`ContentHash`] — BLAKE3 digest of a flattened document, the basis for
//!   optimistic concurrency
//! - [`Document`] / [`DocValue`] — the nested document form a flattened
//!   object graph is stored as

pub mod document;
pub mod error;
pub mod hash;
pub mod oid;

pub use document::{DocValue, Document, FIELD_HASH, FIELD_OID, POINTER_SIGIL};
pub use error::TypeError;
pub use hash::ContentHash;
pub use oid::Oid;
