//! The graph flattener: converts an in-memory object graph into stored
//! documents, minting OIDs, computing content hashes, detecting cycles, and
//! recording pointer ledger entries along the way.

use std::collections::HashSet;

use tracing::debug;
use tugrik_ledger::{PointerLedger, PointerRecord};
use tugrik_schema::{EntityRef, FieldValue, Scalar};
use tugrik_store::{DocumentStore, Filter, UpdateOptions};
use tugrik_types::{ContentHash, DocValue, Document, Oid, FIELD_HASH, FIELD_OID};

use crate::error::{SessionError, SessionResult};

/// One store invocation's flattening state.
///
/// The guard set holds every OID currently being flattened, so each OID is
/// walked at most once per invocation and cyclic graphs terminate.
pub(crate) struct Flattener<'a, S: DocumentStore> {
    store: &'a S,
    ledger: &'a PointerLedger,
    max_depth: usize,
    guard: HashSet<Oid>,
}

impl<'a, S: DocumentStore> Flattener<'a, S> {
    pub(crate) fn new(store: &'a S, ledger: &'a PointerLedger, max_depth: usize) -> Self {
        Self {
            store,
            ledger,
            max_depth,
            guard: HashSet::new(),
        }
    }

    /// Flatten a root composite and write its graph to the store.
    pub(crate) fn run(mut self, entity: &EntityRef) -> SessionResult<Oid> {
        let (oid, _) = self.flatten_composite(entity, "", 0)?;
        Ok(oid)
    }

    /// Flatten one composite, returning its OID and the document written
    /// for it (also embedded at the parent's reference site).
    fn flatten_composite(
        &mut self,
        entity: &EntityRef,
        path: &str,
        depth: usize,
    ) -> SessionResult<(Oid, Document)> {
        if depth > self.max_depth {
            return Err(SessionError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let (existing_oid, known_hash, type_name) = {
            let e = entity.borrow();
            (e.oid().cloned(), e.content_hash().copied(), e.type_name())
        };

        let (oid, stored_hash) = match existing_oid {
            Some(oid) => {
                if self.guard.contains(&oid) {
                    // Cycle break: the document for this OID is still being
                    // built higher up the stack. The parent embeds an empty
                    // copy; the pointer marker stays authoritative.
                    return Ok((oid, Document::new()));
                }
                let stored = self
                    .store
                    .find_one(oid.type_name(), &Filter::by_oid(&oid))?
                    .ok_or_else(|| SessionError::NotFound(oid.clone()))?;
                let stored_hash = stored_document_hash(&oid, &stored)?;
                if known_hash != Some(stored_hash) {
                    return Err(SessionError::ConcurrencyConflict {
                        expected: hash_or_none(known_hash),
                        stored: stored_hash.to_hex(),
                        oid,
                    });
                }
                (oid, Some(stored_hash))
            }
            None => {
                let oid = Oid::mint(type_name)?;
                entity.borrow_mut().identity_mut().oid = Some(oid.clone());
                (oid, None)
            }
        };

        self.guard.insert(oid.clone());

        // Collect fields under a short borrow so recursion can re-borrow
        // entities that appear more than once in the graph.
        let fields: Vec<(&'static str, FieldValue)> = {
            let e = entity.borrow();
            e.field_names()
                .iter()
                .map(|name| e.field(name).map(|value| (*name, value)))
                .collect::<Result<_, _>>()?
        };

        let mut doc = Document::new();
        for (name, value) in fields {
            let field_path = join_path(path, name);
            match value {
                FieldValue::Scalar(scalar) => {
                    doc.insert(name, scalar_wire_value(&scalar)?);
                }
                FieldValue::Sequence(elements) => {
                    let seq = self.flatten_sequence(&elements, &field_path, &oid, depth + 1)?;
                    doc.insert(name, DocValue::Doc(seq));
                }
                FieldValue::Composite(child) => {
                    let (child_oid, child_doc) =
                        self.flatten_composite(&child, &field_path, depth + 1)?;
                    doc.insert(name, DocValue::Doc(child_doc));
                    doc.insert(
                        Document::marker_name(name),
                        DocValue::String(child_oid.to_string()),
                    );
                    self.ledger.record(
                        self.store,
                        &PointerRecord::new(oid.clone(), child_oid, field_path),
                    )?;
                }
            }
        }

        doc.insert(FIELD_OID, DocValue::String(oid.to_string()));
        let hash = ContentHash::of_document(&doc);
        doc.insert(FIELD_HASH, DocValue::String(hash.to_hex()));

        match stored_hash {
            Some(prev) if prev == hash => {
                debug!(oid = %oid, "content unchanged; skipping write");
            }
            Some(prev) => {
                let filter = Filter::by_oid(&oid).and_hash(&prev.to_hex());
                let outcome = self.store.update(
                    oid.type_name(),
                    &filter,
                    doc.clone(),
                    UpdateOptions::replace_one(),
                )?;
                if outcome.matched == 0 {
                    // Another writer replaced the document between our read
                    // and the conditional replace.
                    let stored_now = self
                        .store
                        .find_one(oid.type_name(), &Filter::by_oid(&oid))?
                        .and_then(|d| d.content_hash().and_then(Result::ok));
                    return Err(SessionError::ConcurrencyConflict {
                        expected: prev.to_hex(),
                        stored: hash_or_none(stored_now),
                        oid,
                    });
                }
                entity.borrow_mut().identity_mut().hash = Some(hash);
                debug!(oid = %oid, hash = %hash, "document replaced");
            }
            None => {
                self.store.insert(oid.type_name(), doc.clone())?;
                entity.borrow_mut().identity_mut().hash = Some(hash);
                debug!(oid = %oid, hash = %hash, "document inserted");
            }
        }

        Ok((oid, doc))
    }

    /// Flatten a sequence into its index-keyed subdocument form.
    ///
    /// `owner` is the nearest enclosing composite; its OID owns any pointer
    /// records for composite elements.
    fn flatten_sequence(
        &mut self,
        elements: &[FieldValue],
        path: &str,
        owner: &Oid,
        depth: usize,
    ) -> SessionResult<Document> {
        if depth > self.max_depth {
            return Err(SessionError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let mut doc = Document::new();
        for (index, element) in elements.iter().enumerate() {
            let key = index.to_string();
            let element_path = format!("{path}.{index}");
            match element {
                FieldValue::Scalar(scalar) => {
                    doc.insert(key, scalar_wire_value(scalar)?);
                }
                FieldValue::Sequence(nested) => {
                    let nested_doc =
                        self.flatten_sequence(nested, &element_path, owner, depth + 1)?;
                    doc.insert(key, DocValue::Doc(nested_doc));
                }
                FieldValue::Composite(child) => {
                    let (child_oid, child_doc) =
                        self.flatten_composite(child, &element_path, depth + 1)?;
                    doc.insert(
                        Document::marker_name(&key),
                        DocValue::String(child_oid.to_string()),
                    );
                    doc.insert(key, DocValue::Doc(child_doc));
                    self.ledger.record(
                        self.store,
                        &PointerRecord::new(owner.clone(), child_oid, element_path),
                    )?;
                }
            }
        }
        Ok(doc)
    }
}

// Canonical JSON renders NaN and the infinities as null, so admitting them
// would give documents with different contents the same hash.
fn scalar_wire_value(scalar: &Scalar) -> SessionResult<DocValue> {
    if let Scalar::Float(f) = scalar {
        if !f.is_finite() {
            return Err(SessionError::InvalidArgument(format!(
                "non-finite float {f} cannot be stored"
            )));
        }
    }
    Ok(scalar.to_doc_value())
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn stored_document_hash(oid: &Oid, stored: &Document) -> SessionResult<ContentHash> {
    match stored.content_hash() {
        Some(Ok(hash)) => Ok(hash),
        Some(Err(err)) => Err(SessionError::InvalidArgument(format!(
            "stored document for {oid} carries an unreadable _hash: {err}"
        ))),
        None => Err(SessionError::InvalidArgument(format!(
            "stored document for {oid} carries no _hash"
        ))),
    }
}

fn hash_or_none(hash: Option<ContentHash>) -> String {
    hash.map(|h| h.to_hex()).unwrap_or_else(|| "<none>".into())
}
