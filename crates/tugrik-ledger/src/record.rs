use tugrik_store::Filter;
use tugrik_types::{DocValue, Document, Oid};

/// Collection holding pointer records.
pub const POINTER_COLLECTION: &str = "TugrikMetaPointer";

/// One ownership edge: `owner` holds a reference to `owned` at the dotted
/// field `path` below the owning root composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerRecord {
    pub owner: Oid,
    pub owned: Oid,
    pub path: String,
}

impl PointerRecord {
    pub fn new(owner: Oid, owned: Oid, path: impl Into<String>) -> Self {
        Self {
            owner,
            owned,
            path: path.into(),
        }
    }

    /// The stored document form: `{owner, owned, path}` strings.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("owner", DocValue::String(self.owner.to_string()));
        doc.insert("owned", DocValue::String(self.owned.to_string()));
        doc.insert("path", DocValue::String(self.path.clone()));
        doc
    }

    /// Equality filter on the full triple — the upsert key.
    pub fn key_filter(&self) -> Filter {
        Filter::eq("owner", DocValue::String(self.owner.to_string()))
            .and("owned", DocValue::String(self.owned.to_string()))
            .and("path", DocValue::String(self.path.clone()))
    }
}
