use std::collections::HashMap;

use tracing::debug;
use tugrik_ledger::PointerLedger;
use tugrik_schema::{EntityRef, SchemaRegistry};
use tugrik_store::{DocumentStore, Filter};
use tugrik_types::{Document, Oid};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::flatten::Flattener;
use crate::rebuild::Rebuilder;

/// One logical unit of work against a document store.
///
/// A session owns the object cache: within one session, every OID
/// materializes as exactly one shared object, and fetches are served from
/// the cache before the store is touched. The cache never evicts — the
/// unbounded growth is the price of the single-identity guarantee, and a
/// session is expected to be short-lived relative to the process.
pub struct Session<S: DocumentStore> {
    config: SessionConfig,
    backend: S,
    registry: SchemaRegistry,
    ledger: PointerLedger,
    cache: HashMap<Oid, EntityRef>,
}

impl<S: DocumentStore> Session<S> {
    /// Open a session over a store backend.
    ///
    /// Fails with [`SessionError::Configuration`] if the configuration
    /// cannot name a database to work against.
    pub fn open(config: SessionConfig, backend: S, registry: SchemaRegistry) -> SessionResult<Self> {
        config.validate()?;
        debug!(database = %config.database, dsn = %config.dsn, "session opened");
        Ok(Self {
            config,
            backend,
            registry,
            ledger: PointerLedger::new(),
            cache: HashMap::new(),
        })
    }

    /// Persist a composite and, transitively, every composite it references.
    ///
    /// Assigns an OID on first persist, refreshes the content hash, and
    /// performs a conditional replace when updating: if another writer
    /// persisted a change since this copy was last fetched, the call fails
    /// with [`SessionError::ConcurrencyConflict`] and nothing further is
    /// written. Nested composites reached earlier in the walk may already
    /// have been committed at that point.
    pub fn store(&mut self, entity: &EntityRef) -> SessionResult<Oid> {
        let flattener = Flattener::new(&self.backend, &self.ledger, self.config.max_depth);
        let oid = flattener.run(entity)?;
        self.cache.insert(oid.clone(), entity.clone());
        debug!(oid = %oid, "object stored");
        Ok(oid)
    }

    /// Materialize the composite stored under an OID.
    ///
    /// Consults the session cache first; on a miss, reads the document and
    /// rebuilds the composite, recursively fetching referenced composites.
    /// Fails with [`SessionError::NotFound`] if no document carries the OID.
    pub fn fetch(&mut self, oid: &Oid) -> SessionResult<EntityRef> {
        let mut rebuilder = Rebuilder::new(
            &self.backend,
            &self.registry,
            &mut self.cache,
            self.config.max_depth,
        );
        rebuilder.fetch(oid, 0)
    }

    /// [`Session::fetch`] for an OID in string form.
    pub fn fetch_str(&mut self, oid: &str) -> SessionResult<EntityRef> {
        let oid = Oid::parse(oid)?;
        self.fetch(&oid)
    }

    /// Remove the document stored under an OID, and its cache entry.
    pub fn delete(&mut self, oid: &Oid) -> SessionResult<()> {
        if !self.backend.has_collection(oid.type_name())? {
            return Err(SessionError::CollectionMissing(oid.type_name().to_string()));
        }
        let removed = self.backend.remove(oid.type_name(), &Filter::by_oid(oid), true)?;
        if removed == 0 {
            return Err(SessionError::NotFound(oid.clone()));
        }
        self.cache.remove(oid);
        debug!(oid = %oid, "object deleted");
        Ok(())
    }

    /// [`Session::delete`] by entity, stripping its identity afterwards so
    /// the object returns to the transient state.
    pub fn delete_entity(&mut self, entity: &EntityRef) -> SessionResult<()> {
        let oid = entity.borrow().oid().cloned().ok_or_else(|| {
            SessionError::InvalidArgument("cannot delete an entity that has no _oid".into())
        })?;
        self.delete(&oid)?;
        entity.borrow_mut().identity_mut().clear();
        Ok(())
    }

    // ---- Pass-through queries ----

    pub fn find(&self, collection: &str, filter: &Filter) -> SessionResult<Vec<Document>> {
        Ok(self.backend.find(collection, filter)?)
    }

    pub fn find_one(&self, collection: &str, filter: &Filter) -> SessionResult<Option<Document>> {
        Ok(self.backend.find_one(collection, filter)?)
    }

    pub fn count(&self, collection: &str) -> SessionResult<u64> {
        Ok(self.backend.count(collection)?)
    }

    // ---- Accessors ----

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether an OID is materialized in this session's cache.
    pub fn is_cached(&self, oid: &Oid) -> bool {
        self.cache.contains_key(oid)
    }

    /// Number of objects materialized in this session.
    pub fn cached_objects(&self) -> usize {
        self.cache.len()
    }
}

impl<S: DocumentStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("database", &self.config.database)
            .field("cached_objects", &self.cache.len())
            .finish_non_exhaustive()
    }
}
