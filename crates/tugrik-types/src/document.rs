use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::ContentHash;
use crate::oid::Oid;

/// Trailer field naming the document's OID.
pub const FIELD_OID: &str = "_oid";

/// Trailer field holding the document's content hash.
pub const FIELD_HASH: &str = "_hash";

/// Reserved sigil prefixed to a field name to form its pointer marker.
///
/// When a composite reference is flattened, the referenced composite's
/// subdocument is inlined under the field name and the referenced OID is
/// written under `*field` alongside it.
pub const POINTER_SIGIL: char = '*';

/// A single value inside a stored document.
///
/// This is the closed set of shapes a flattened field can take. There is no
/// array variant: a flattened sequence is a [`Document`] keyed by decimal
/// element index, which is the only form that can carry pointer markers for
/// composite elements (see [`Document::sequence_indices`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Doc(Document),
}

impl DocValue {
    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested document, if this is a subdocument.
    pub fn as_doc(&self) -> Option<&Document> {
        match self {
            DocValue::Doc(d) => Some(d),
            _ => None,
        }
    }
}

/// An ordered field map, the stored form of one flattened composite.
///
/// Fields are kept sorted by name, so serialization is canonical and the
/// content hash of a document is well defined.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, DocValue>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: DocValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&DocValue> {
        self.fields.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<DocValue> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in sorted name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, DocValue> {
        self.fields.iter()
    }

    /// The marker field name for a given field: `*field`.
    pub fn marker_name(field: &str) -> String {
        format!("{POINTER_SIGIL}{field}")
    }

    /// Strip the pointer sigil from a marker field name, if it carries one.
    pub fn strip_marker(name: &str) -> Option<&str> {
        name.strip_prefix(POINTER_SIGIL)
    }

    /// Parse the `_oid` trailer, if present.
    pub fn oid(&self) -> Option<Result<Oid, TypeError>> {
        self.get(FIELD_OID)
            .and_then(DocValue::as_str)
            .map(Oid::parse)
    }

    /// Parse the `_hash` trailer, if present.
    pub fn content_hash(&self) -> Option<Result<ContentHash, TypeError>> {
        self.get(FIELD_HASH)
            .and_then(DocValue::as_str)
            .map(ContentHash::from_hex)
    }

    /// Element indices of a flattened sequence, in numeric order.
    ///
    /// A flattened sequence is a subdocument whose keys are canonical
    /// decimal indices (plus `*index` markers for composite elements).
    /// Marker fields are ignored; any other key that does not render back
    /// to itself as a decimal (`"city"`, `"00"`, `"+1"`) yields `None`,
    /// marking the subdocument as not a sequence.
    pub fn sequence_indices(&self) -> Option<Vec<usize>> {
        let mut indices = Vec::new();
        for name in self.fields.keys() {
            if Self::strip_marker(name).is_some() {
                continue;
            }
            let index = name.parse::<usize>().ok()?;
            if index.to_string() != *name {
                return None;
            }
            indices.push(index);
        }
        indices.sort_unstable();
        Some(indices)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a DocValue);
    type IntoIter = btree_map::Iter<'a, String, DocValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
