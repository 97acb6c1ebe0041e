//! Tugrik sessions: the object-document mapping core.
//!
//! A [`Session`] owns one logical unit of work against a document store. It
//! flattens in-memory object graphs into nested documents on
//! [`Session::store`], rebuilds them on [`Session::fetch`], and keeps a
//! per-session cache so every OID materializes as exactly one object.
//!
//! # Object lifecycle
//!
//! A composite moves through these states:
//!
//! - *Transient* — no OID assigned yet.
//! - *Persisted-Clean* — OID assigned, in-memory hash equals the stored
//!   hash.
//! - *Persisted-Dirty* — fields mutated since the last persist.
//! - *Conflicted* — a store attempt found the stored hash no longer equal
//!   to the last-known hash; surfaces as
//!   [`SessionError::ConcurrencyConflict`] and is terminal for that call.
//!   Re-fetch before retrying.
//! - *Deleted* — [`Session::delete_entity`] stripped the OID and hash.
//!
//! `store` moves Transient/Dirty to Clean (or Conflicted); mutating fields
//! moves Clean to Dirty; `delete` moves any state to Deleted.
//!
//! # Concurrency
//!
//! A session is single-threaded: the cache and the recursion guard are not
//! reentrant-safe, and object graphs are wired with `Rc<RefCell<_>>`.
//! Multiple sessions may share one store; lost updates between them are
//! detected through the content hash, relying on the store's atomic
//! conditional replace as the sole concurrency-control primitive.

pub mod config;
pub mod error;
mod flatten;
mod rebuild;
pub mod session;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::Session;

// Re-export the types callers need to define schemas and drive a session.
pub use tugrik_ledger::{PointerRecord, POINTER_COLLECTION};
pub use tugrik_schema::{
    borrow_as, borrow_as_mut, entity_ref, Entity, EntityRef, FieldValue, Identity, Scalar,
    SchemaRegistry,
};
pub use tugrik_store::{DocumentStore, Filter, InMemoryStore};
pub use tugrik_types::{ContentHash, DocValue, Document, Oid};
