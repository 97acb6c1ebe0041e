/// Errors from parsing or constructing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// An OID string does not have the `TypeName::token` shape.
    #[error("malformed object identifier: {0:?}")]
    MalformedOid(String),

    /// A type name is empty or contains the reserved `::` separator.
    #[error("invalid type name: {0:?}")]
    InvalidTypeName(String),

    /// A hash string is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A hash string decodes to the wrong number of bytes.
    #[error("invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
