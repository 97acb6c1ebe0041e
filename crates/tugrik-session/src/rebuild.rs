//! The rebuilder: materializes composites from stored documents, resolving
//! pointer markers through the session cache and recursive fetches.

use std::collections::HashMap;

use tracing::debug;
use tugrik_schema::{EntityRef, FieldValue, Scalar, SchemaError, SchemaRegistry};
use tugrik_store::{DocumentStore, Filter};
use tugrik_types::{DocValue, Document, Oid, FIELD_HASH, FIELD_OID};

use crate::error::{SessionError, SessionResult};

/// One fetch invocation's rebuilding state, borrowing the session cache.
pub(crate) struct Rebuilder<'a, S: DocumentStore> {
    store: &'a S,
    registry: &'a SchemaRegistry,
    cache: &'a mut HashMap<Oid, EntityRef>,
    max_depth: usize,
}

impl<'a, S: DocumentStore> Rebuilder<'a, S> {
    pub(crate) fn new(
        store: &'a S,
        registry: &'a SchemaRegistry,
        cache: &'a mut HashMap<Oid, EntityRef>,
        max_depth: usize,
    ) -> Self {
        Self {
            store,
            registry,
            cache,
            max_depth,
        }
    }

    /// Resolve an OID to a materialized composite, cache first.
    pub(crate) fn fetch(&mut self, oid: &Oid, depth: usize) -> SessionResult<EntityRef> {
        if depth > self.max_depth {
            return Err(SessionError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        if let Some(cached) = self.cache.get(oid) {
            debug!(oid = %oid, "fetch served from session cache");
            return Ok(cached.clone());
        }
        let doc = self
            .store
            .find_one(oid.type_name(), &Filter::by_oid(oid))?
            .ok_or_else(|| SessionError::NotFound(oid.clone()))?;
        self.materialize(&doc, depth)
    }

    /// Instantiate and hydrate a composite from its stored document.
    ///
    /// The shell is registered in the cache before its fields are hydrated:
    /// this is what terminates cyclic graphs and guarantees one identity per
    /// OID within the session.
    fn materialize(&mut self, doc: &Document, depth: usize) -> SessionResult<EntityRef> {
        let oid = doc
            .oid()
            .ok_or_else(|| {
                SessionError::InvalidArgument("stored document carries no _oid".into())
            })??;

        let entity = self.registry.instantiate(oid.type_name())?;
        {
            let mut e = entity.borrow_mut();
            let identity = e.identity_mut();
            identity.oid = Some(oid.clone());
            identity.hash = doc.content_hash().transpose()?;
        }
        self.cache.insert(oid.clone(), entity.clone());

        for (name, value) in doc {
            if name.as_str() == FIELD_OID || name.as_str() == FIELD_HASH {
                continue;
            }
            if let Some(field) = Document::strip_marker(name) {
                let target = marker_target(name, value)?;
                let child = self.fetch(&target, depth + 1)?;
                self.assign(&entity, field, FieldValue::Composite(child))?;
                continue;
            }
            if doc.contains(&Document::marker_name(name)) {
                // Inline copy of a referenced composite; the marker above is
                // authoritative, so the copy is not assigned separately.
                continue;
            }
            let rebuilt = self.rebuild_value(value, depth + 1)?;
            self.assign(&entity, name, rebuilt)?;
        }

        debug!(oid = %oid, "composite materialized");
        Ok(entity)
    }

    /// Recover a field value from its document form.
    fn rebuild_value(&mut self, value: &DocValue, depth: usize) -> SessionResult<FieldValue> {
        if depth > self.max_depth {
            return Err(SessionError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        if let Some(scalar) = Scalar::from_doc_value(value) {
            return Ok(FieldValue::Scalar(scalar));
        }
        let doc = value
            .as_doc()
            .expect("non-scalar doc values are subdocuments");
        let indices = doc.sequence_indices().ok_or_else(|| {
            SessionError::UnsupportedType(
                "subdocument without a pointer marker is not a flattened sequence".into(),
            )
        })?;

        let mut elements = Vec::with_capacity(indices.len());
        for index in indices {
            let key = index.to_string();
            if let Some(marker) = doc.get(&Document::marker_name(&key)) {
                let target = marker_target(&key, marker)?;
                let child = self.fetch(&target, depth + 1)?;
                elements.push(FieldValue::Composite(child));
                continue;
            }
            let element = doc
                .get(&key)
                .expect("sequence_indices only reports present keys");
            elements.push(self.rebuild_value(element, depth + 1)?);
        }
        Ok(FieldValue::Sequence(elements))
    }

    /// Assign one field, skipping names the live schema no longer declares.
    fn assign(&self, entity: &EntityRef, field: &str, value: FieldValue) -> SessionResult<()> {
        match entity.borrow_mut().set_field(field, value) {
            Ok(()) => Ok(()),
            Err(SchemaError::UnknownField { type_name, field }) => {
                // Stored documents may carry fields a newer schema dropped;
                // forward-compatible but lossy.
                debug!(type_name, field, "skipping field absent from live schema");
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }
}

fn marker_target(name: &str, value: &DocValue) -> SessionResult<Oid> {
    let oid_str = value.as_str().ok_or_else(|| {
        SessionError::InvalidArgument(format!("pointer marker {name:?} does not hold an OID string"))
    })?;
    Ok(Oid::parse(oid_str)?)
}
