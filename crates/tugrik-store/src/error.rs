/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be reached or refuses the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An insert would duplicate an `_oid` within its collection.
    #[error("duplicate _oid {oid} in collection {collection}")]
    DuplicateOid { collection: String, oid: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
