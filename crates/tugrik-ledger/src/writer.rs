use tracing::{debug, warn};
use tugrik_store::{DocumentStore, UpdateOptions};

use crate::error::{LedgerError, LedgerResult};
use crate::record::{PointerRecord, POINTER_COLLECTION};

/// Writer for the pointer ledger.
///
/// Upserts each record keyed by its full `(owner, owned, path)` triple, so
/// re-flattening an unchanged graph leaves the ledger unchanged. Ledger
/// writes are not transactional with the primary document write; a failed
/// write is retried a bounded number of times before the error propagates.
pub struct PointerLedger {
    attempts: u32,
}

impl PointerLedger {
    /// A writer with the default retry budget.
    pub fn new() -> Self {
        Self { attempts: 3 }
    }

    /// Override the retry budget (minimum 1 attempt).
    pub fn with_attempts(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    /// Upsert one ownership edge.
    pub fn record<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        record: &PointerRecord,
    ) -> LedgerResult<()> {
        let filter = record.key_filter();
        let mut last_err = None;
        for attempt in 1..=self.attempts {
            match store.update(
                POINTER_COLLECTION,
                &filter,
                record.to_document(),
                UpdateOptions::upsert_one(),
            ) {
                Ok(outcome) => {
                    debug!(
                        owner = %record.owner,
                        owned = %record.owned,
                        path = %record.path,
                        fresh = outcome.upserted,
                        "pointer recorded"
                    );
                    return Ok(());
                }
                Err(err) => {
                    warn!(
                        attempt,
                        attempts = self.attempts,
                        error = %err,
                        "pointer record write failed"
                    );
                    last_err = Some(err);
                }
            }
        }
        Err(LedgerError::WriteFailed {
            attempts: self.attempts,
            // last_err is always set when the loop falls through
            source: last_err.expect("at least one attempt"),
        })
    }
}

impl Default for PointerLedger {
    fn default() -> Self {
        Self::new()
    }
}
