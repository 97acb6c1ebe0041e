use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::TypeError;

/// Content hash of a flattened document.
///
/// A `ContentHash` is the BLAKE3 digest of a document's canonical JSON
/// bytes, excluding the document's own `_hash` field. It is the whole of the
/// optimistic concurrency scheme: a conditional replace keyed by
/// `(OID, stored hash)` succeeds only if nobody persisted a change since the
/// caller last saw the document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a flattened document.
    ///
    /// The document must not yet carry its `_hash` trailer; the caller
    /// inserts the trailer after computing the hash. Keys are sorted in the
    /// document model, so serialization is canonical. Float values must be
    /// finite: serde_json renders NaN and the infinities as `null`, which
    /// would collapse distinct documents onto one digest.
    pub fn of_document(doc: &Document) -> Self {
        let bytes = serde_json::to_vec(doc).expect("document serialization is infallible");
        Self(*blake3::hash(&bytes).as_bytes())
    }

    /// Hex-encoded string representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
