use tugrik_store::StoreError;

/// Errors from pointer ledger writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The record could not be written even after retrying.
    ///
    /// The primary document write is not transactional with the ledger, so
    /// when this surfaces the ledger may be missing an edge the store
    /// already persisted. The caller decides whether to fail the operation;
    /// the inconsistency is never hidden.
    #[error("pointer record write failed after {attempts} attempts: {source}")]
    WriteFailed {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
