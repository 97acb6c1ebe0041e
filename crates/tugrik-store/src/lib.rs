//! Document storage for Tugrik.
//!
//! This crate defines the [`DocumentStore`] trait the mapper writes through —
//! collections of nested documents, equality filters, and an atomic
//! conditional update — plus the [`InMemoryStore`] backend used for tests and
//! embedding.
//!
//! # Design Rules
//!
//! 1. A collection is named after the composite type it stores,
//!    case-sensitive.
//! 2. `update` executes match-and-replace as a single atomic operation.
//!    This is the sole concurrency-control primitive of the whole mapper:
//!    optimistic replaces are keyed by `(_oid, _hash)` and a lost race shows
//!    up as zero matched documents, never as a partial write.
//! 3. The store never interprets document contents beyond filter equality.
//! 4. Backend errors are propagated, never silently ignored.

pub mod error;
pub mod filter;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::InMemoryStore;
pub use traits::{DocumentStore, UpdateOptions, UpdateOutcome};
