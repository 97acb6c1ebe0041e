use tugrik_ledger::LedgerError;
use tugrik_schema::SchemaError;
use tugrik_store::StoreError;
use tugrik_types::{Oid, TypeError};

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The session was opened with an unusable configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The store is unreachable.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// An operation was called with an unsupported argument shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A type name cannot be resolved to a known composite shape.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The stored hash differs from the caller's last-known hash: someone
    /// persisted a change since this copy was last fetched. Terminal for
    /// this store call; re-fetch before retrying.
    #[error("concurrency conflict on {oid}: last-known hash {expected}, stored hash {stored}")]
    ConcurrencyConflict {
        oid: Oid,
        expected: String,
        stored: String,
    },

    /// A delete targeted a collection that does not exist.
    #[error("collection does not exist: {0}")]
    CollectionMissing(String),

    /// No stored document carries this OID.
    #[error("no stored document for {0}")]
    NotFound(Oid),

    /// The object graph is deeper than the configured bound.
    #[error("object graph exceeds the configured depth bound of {limit}")]
    DepthExceeded { limit: usize },

    /// A field getter or setter failed.
    #[error(transparent)]
    Schema(SchemaError),

    /// A pointer ledger write failed after retries.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Any other store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => SessionError::Connection(msg),
            other => SessionError::Store(other),
        }
    }
}

impl From<SchemaError> for SessionError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownType(name) => SessionError::UnsupportedType(name),
            other => SessionError::Schema(other),
        }
    }
}

impl From<TypeError> for SessionError {
    fn from(err: TypeError) -> Self {
        SessionError::InvalidArgument(err.to_string())
    }
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
