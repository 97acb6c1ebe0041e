//! Pointer ledger for Tugrik.
//!
//! Every time the flattener replaces a nested composite reference with a
//! pointer marker, it records the ownership edge here: a
//! [`PointerRecord`] triple `(owner, owned, path)` in the dedicated
//! `TugrikMetaPointer` collection, upserted by the full triple so one
//! reference site yields exactly one record no matter how often the owner
//! is re-stored.
//!
//! The ledger is write-only in this scope — nothing consults it yet — but
//! it must be complete, so a future reverse-lookup or cascade-delete
//! feature has all edges available.

pub mod error;
pub mod record;
pub mod writer;

pub use error::{LedgerError, LedgerResult};
pub use record::{PointerRecord, POINTER_COLLECTION};
pub use writer::PointerLedger;
