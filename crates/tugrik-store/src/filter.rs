use std::collections::BTreeMap;

use tugrik_types::{DocValue, Document, Oid, FIELD_HASH, FIELD_OID};

/// A conjunction of field equality tests.
///
/// This is the only filter shape the mapper needs: documents are looked up
/// by `_oid`, conditionally replaced by `(_oid, _hash)`, and ledger records
/// are upserted by their full `(owner, owned, path)` triple. An empty filter
/// matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    tests: BTreeMap<String, DocValue>,
}

impl Filter {
    /// A filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Start a filter from one equality test.
    pub fn eq(field: impl Into<String>, value: DocValue) -> Self {
        Self::all().and(field, value)
    }

    /// Add an equality test.
    pub fn and(mut self, field: impl Into<String>, value: DocValue) -> Self {
        self.tests.insert(field.into(), value);
        self
    }

    /// Filter by the `_oid` trailer.
    pub fn by_oid(oid: &Oid) -> Self {
        Self::eq(FIELD_OID, DocValue::String(oid.to_string()))
    }

    /// Add an equality test on the `_hash` trailer.
    pub fn and_hash(self, hash_hex: &str) -> Self {
        self.and(FIELD_HASH, DocValue::String(hash_hex.to_string()))
    }

    /// Returns `true` if every test matches the document exactly.
    pub fn matches(&self, doc: &Document) -> bool {
        self.tests
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    /// The tested fields as a document, used to seed upserted documents.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (field, value) in &self.tests {
            doc.insert(field.clone(), value.clone());
        }
        doc
    }
}
