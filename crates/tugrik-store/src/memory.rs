use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;
use tugrik_types::{DocValue, Document, FIELD_OID};

use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::traits::{DocumentStore, UpdateOptions, UpdateOutcome};

/// In-memory, map-backed document store.
///
/// Intended for tests and embedding. Collections live behind a single
/// `RwLock`, so `update` holds the write lock across match-and-replace and
/// the conditional-replace contract holds trivially. Documents are cloned
/// on read.
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Total documents across all collections.
    pub fn total_documents(&self) -> usize {
        self.collections
            .read()
            .expect("lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Remove all collections.
    pub fn clear(&self) {
        self.collections.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_oid(docs: &[Document], candidate: &Document) -> Option<String> {
    let oid = candidate.get(FIELD_OID).and_then(DocValue::as_str)?;
    docs.iter()
        .any(|existing| existing.get(FIELD_OID).and_then(DocValue::as_str) == Some(oid))
        .then(|| oid.to_string())
}

impl DocumentStore for InMemoryStore {
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let map = self.collections.read().expect("lock poisoned");
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let map = self.collections.read().expect("lock poisoned");
        Ok(map
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        let mut map = self.collections.write().expect("lock poisoned");
        let docs = map.entry(collection.to_string()).or_default();
        if let Some(oid) = duplicate_oid(docs, &document) {
            return Err(StoreError::DuplicateOid {
                collection: collection.to_string(),
                oid,
            });
        }
        debug!(collection, fields = document.len(), "document inserted");
        docs.push(document);
        Ok(())
    }

    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
        options: UpdateOptions,
    ) -> StoreResult<UpdateOutcome> {
        let mut map = self.collections.write().expect("lock poisoned");
        let docs = map.entry(collection.to_string()).or_default();

        let mut matched = 0u64;
        for existing in docs.iter_mut() {
            if !filter.matches(existing) {
                continue;
            }
            *existing = document.clone();
            matched += 1;
            if !options.multiple {
                break;
            }
        }

        if matched == 0 && options.upsert {
            debug!(collection, "update matched nothing; upserting");
            docs.push(document);
            return Ok(UpdateOutcome {
                matched: 0,
                upserted: true,
            });
        }

        debug!(collection, matched, "documents replaced");
        Ok(UpdateOutcome {
            matched,
            upserted: false,
        })
    }

    fn remove(&self, collection: &str, filter: &Filter, only_one: bool) -> StoreResult<u64> {
        let mut map = self.collections.write().expect("lock poisoned");
        let Some(docs) = map.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        if only_one {
            if let Some(pos) = docs.iter().position(|doc| filter.matches(doc)) {
                docs.remove(pos);
            }
        } else {
            docs.retain(|doc| !filter.matches(doc));
        }
        let removed = (before - docs.len()) as u64;
        debug!(collection, removed, "documents removed");
        Ok(removed)
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        let map = self.collections.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    fn count(&self, collection: &str) -> StoreResult<u64> {
        let map = self.collections.read().expect("lock poisoned");
        Ok(map.get(collection).map(Vec::len).unwrap_or(0) as u64)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("document_count", &self.total_documents())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugrik_types::FIELD_HASH;

    fn person_doc(oid: &str, hash: &str, name: &str) -> Document {
        let mut doc = Document::new();
        doc.insert(FIELD_OID, DocValue::String(oid.into()));
        doc.insert(FIELD_HASH, DocValue::String(hash.into()));
        doc.insert("name", DocValue::String(name.into()));
        doc
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_find_one() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();

        let found = store
            .find_one(
                "Person",
                &Filter::eq(FIELD_OID, DocValue::String("Person::a".into())),
            )
            .unwrap()
            .expect("should exist");
        assert_eq!(found.get("name").and_then(DocValue::as_str), Some("Ann"));
    }

    #[test]
    fn find_one_on_missing_collection() {
        let store = InMemoryStore::new();
        assert_eq!(store.find_one("Ghost", &Filter::all()).unwrap(), None);
    }

    #[test]
    fn insert_rejects_duplicate_oid() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        let err = store
            .insert("Person", person_doc("Person::a", "h2", "Ann again"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateOid { .. }));
    }

    #[test]
    fn same_oid_in_different_collections_is_fine() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        store
            .insert("Backup", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        assert_eq!(store.total_documents(), 2);
    }

    #[test]
    fn find_returns_all_matches() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        store
            .insert("Person", person_doc("Person::b", "h2", "Ann"))
            .unwrap();
        store
            .insert("Person", person_doc("Person::c", "h3", "Bob"))
            .unwrap();

        let anns = store
            .find("Person", &Filter::eq("name", DocValue::String("Ann".into())))
            .unwrap();
        assert_eq!(anns.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Conditional replace
    // -----------------------------------------------------------------------

    #[test]
    fn conditional_replace_hits_on_matching_hash() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();

        let filter = Filter::eq(FIELD_OID, DocValue::String("Person::a".into())).and_hash("h1");
        let outcome = store
            .update(
                "Person",
                &filter,
                person_doc("Person::a", "h2", "Ann Updated"),
                UpdateOptions::replace_one(),
            )
            .unwrap();
        assert_eq!(outcome.matched, 1);
        assert!(!outcome.upserted);

        let stored = store.find_one("Person", &Filter::all()).unwrap().unwrap();
        assert_eq!(stored.get(FIELD_HASH).and_then(DocValue::as_str), Some("h2"));
    }

    #[test]
    fn conditional_replace_misses_on_stale_hash() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h2", "Ann"))
            .unwrap();

        let stale = Filter::eq(FIELD_OID, DocValue::String("Person::a".into())).and_hash("h1");
        let outcome = store
            .update(
                "Person",
                &stale,
                person_doc("Person::a", "h3", "Lost Race"),
                UpdateOptions::replace_one(),
            )
            .unwrap();
        assert_eq!(outcome.matched, 0);
        assert!(!outcome.upserted);

        // Stored document untouched.
        let stored = store.find_one("Person", &Filter::all()).unwrap().unwrap();
        assert_eq!(stored.get("name").and_then(DocValue::as_str), Some("Ann"));
    }

    #[test]
    fn upsert_inserts_when_nothing_matches() {
        let store = InMemoryStore::new();
        let filter = Filter::eq("owner", DocValue::String("A::1".into()));
        let outcome = store
            .update(
                "TugrikMetaPointer",
                &filter,
                filter.to_document(),
                UpdateOptions::upsert_one(),
            )
            .unwrap();
        assert!(outcome.upserted);
        assert_eq!(store.count("TugrikMetaPointer").unwrap(), 1);
    }

    #[test]
    fn upsert_replaces_when_matched() {
        let store = InMemoryStore::new();
        let filter = Filter::eq("owner", DocValue::String("A::1".into()));
        let mut doc = filter.to_document();
        doc.insert("path", DocValue::String("address".into()));

        store
            .update("TugrikMetaPointer", &filter, doc.clone(), UpdateOptions::upsert_one())
            .unwrap();
        let outcome = store
            .update("TugrikMetaPointer", &filter, doc, UpdateOptions::upsert_one())
            .unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(store.count("TugrikMetaPointer").unwrap(), 1);
    }

    #[test]
    fn update_multiple_replaces_all_matches() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h", "Ann"))
            .unwrap();
        store
            .insert("Person", person_doc("Person::b", "h", "Ann"))
            .unwrap();

        let outcome = store
            .update(
                "Person",
                &Filter::eq("name", DocValue::String("Ann".into())),
                person_doc("Person::x", "h", "Renamed"),
                UpdateOptions {
                    upsert: false,
                    multiple: true,
                },
            )
            .unwrap();
        assert_eq!(outcome.matched, 2);
    }

    // -----------------------------------------------------------------------
    // Remove / collections
    // -----------------------------------------------------------------------

    #[test]
    fn remove_only_one() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        store
            .insert("Person", person_doc("Person::b", "h2", "Ann"))
            .unwrap();

        let removed = store
            .remove(
                "Person",
                &Filter::eq("name", DocValue::String("Ann".into())),
                true,
            )
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count("Person").unwrap(), 1);
    }

    #[test]
    fn remove_all_matches() {
        let store = InMemoryStore::new();
        store
            .insert("Person", person_doc("Person::a", "h1", "Ann"))
            .unwrap();
        store
            .insert("Person", person_doc("Person::b", "h2", "Ann"))
            .unwrap();

        let removed = store
            .remove(
                "Person",
                &Filter::eq("name", DocValue::String("Ann".into())),
                false,
            )
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count("Person").unwrap(), 0);
    }

    #[test]
    fn remove_from_missing_collection() {
        let store = InMemoryStore::new();
        assert_eq!(store.remove("Ghost", &Filter::all(), true).unwrap(), 0);
    }

    #[test]
    fn list_collections_sorted() {
        let store = InMemoryStore::new();
        store.insert("Person", Document::new()).unwrap();
        store.insert("Address", Document::new()).unwrap();
        assert_eq!(store.list_collections().unwrap(), vec!["Address", "Person"]);
        assert!(store.has_collection("Person").unwrap());
        assert!(!store.has_collection("person").unwrap());
    }

    #[test]
    fn count_missing_collection_is_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.count("Ghost").unwrap(), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let store = InMemoryStore::new();
        store.insert("Person", Document::new()).unwrap();
        store.clear();
        assert_eq!(store.total_documents(), 0);
        assert!(store.list_collections().unwrap().is_empty());
    }
}
