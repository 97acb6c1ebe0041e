use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Default maximum flatten/rebuild recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default data source name.
pub const DEFAULT_DSN: &str = "mongodb://localhost:27017";

/// Configuration for a session.
///
/// An explicit value built by the caller and handed to
/// [`crate::Session::open`] — there is no process-wide setup call, and two
/// sessions with different configurations can coexist in one process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the target database.
    pub database: String,
    /// Data source name the store driver connects with.
    pub dsn: String,
    /// Maximum object graph depth a flatten or rebuild will walk before
    /// failing, bounding stack growth on pathological graphs.
    pub max_depth: usize,
}

impl SessionConfig {
    /// Configuration for the given database and DSN.
    pub fn new(database: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            dsn: dsn.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Configuration for a local store at the default DSN.
    pub fn local(database: impl Into<String>) -> Self {
        Self::new(database, DEFAULT_DSN)
    }

    /// Override the recursion depth bound (minimum 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Reject configurations a session cannot be built from.
    pub(crate) fn validate(&self) -> SessionResult<()> {
        if self.database.is_empty() {
            return Err(SessionError::Configuration(
                "database name must not be empty".into(),
            ));
        }
        if self.dsn.is_empty() {
            return Err(SessionError::Configuration("dsn must not be empty".into()));
        }
        Ok(())
    }
}
