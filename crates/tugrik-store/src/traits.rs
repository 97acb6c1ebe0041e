use tugrik_types::Document;

use crate::error::StoreResult;
use crate::filter::Filter;

/// Options for [`DocumentStore::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Insert the replacement document if nothing matched.
    pub upsert: bool,
    /// Replace every matching document rather than only the first.
    pub multiple: bool,
}

impl UpdateOptions {
    /// Replace at most one document, never insert. The conditional-replace
    /// mode the flattener uses.
    pub fn replace_one() -> Self {
        Self::default()
    }

    /// Insert when nothing matched, replace one otherwise. The ledger's
    /// upsert-by-triple mode.
    pub fn upsert_one() -> Self {
        Self {
            upsert: true,
            multiple: false,
        }
    }
}

/// Result of an [`DocumentStore::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents that matched the filter and were replaced.
    pub matched: u64,
    /// Whether an upsert inserted a new document.
    pub upserted: bool,
}

/// A store of named collections of documents.
///
/// All implementations must satisfy these invariants:
/// - Collection names are case-sensitive and collections appear on first
///   insert; reads against an absent collection are empty, not errors.
/// - `update` executes match-and-replace atomically. Callers key optimistic
///   replaces by `(_oid, _hash)` and rely on `matched == 0` to mean another
///   writer won the race — the store must never interleave a concurrent
///   write between the match and the replace.
/// - `insert` rejects a duplicate `_oid` within a collection.
/// - Backend errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Return the first document matching the filter, if any.
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Return every document matching the filter.
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Insert a document into a collection, creating the collection if
    /// needed.
    fn insert(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Atomically replace matching documents with `document`.
    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
        options: UpdateOptions,
    ) -> StoreResult<UpdateOutcome>;

    /// Remove matching documents; with `only_one`, at most the first.
    /// Returns the number removed.
    fn remove(&self, collection: &str, filter: &Filter, only_one: bool) -> StoreResult<u64>;

    /// Names of all existing collections, sorted.
    fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Number of documents in a collection (0 for an absent collection).
    fn count(&self, collection: &str) -> StoreResult<u64>;

    /// Whether the collection exists.
    fn has_collection(&self, collection: &str) -> StoreResult<bool> {
        Ok(self
            .list_collections()?
            .iter()
            .any(|name| name == collection))
    }
}

// Shared handles delegate, so several sessions can run against one backend.
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        (**self).find_one(collection, filter)
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        (**self).find(collection, filter)
    }

    fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        (**self).insert(collection, document)
    }

    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
        options: UpdateOptions,
    ) -> StoreResult<UpdateOutcome> {
        (**self).update(collection, filter, document, options)
    }

    fn remove(&self, collection: &str, filter: &Filter, only_one: bool) -> StoreResult<u64> {
        (**self).remove(collection, filter, only_one)
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        (**self).list_collections()
    }

    fn count(&self, collection: &str) -> StoreResult<u64> {
        (**self).count(collection)
    }
}
