use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tugrik_types::{ContentHash, Oid};

use crate::error::SchemaError;
use crate::value::FieldValue;

/// The identity trailer fields a composite acquires when persisted.
///
/// `oid` is assigned at first persist and immutable thereafter; `hash` is
/// refreshed on every successful persist and is the caller's last-known
/// content hash for conflict detection. `delete` strips both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Identity {
    pub oid: Option<Oid>,
    pub hash: Option<ContentHash>,
}

impl Identity {
    /// Returns `true` once an OID has been assigned.
    pub fn is_persisted(&self) -> bool {
        self.oid.is_some()
    }

    /// Strip both trailer fields (the Deleted state).
    pub fn clear(&mut self) {
        self.oid = None;
        self.hash = None;
    }
}

/// Shared handle to a composite. Sessions are single-threaded, so graphs
/// are wired with `Rc<RefCell<_>>` rather than atomics.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Wrap a concrete entity into the shared handle form.
pub fn entity_ref<T: Entity>(entity: T) -> EntityRef {
    Rc::new(RefCell::new(entity))
}

/// A composite type with an introspectable field list.
///
/// This is the per-type field descriptor surface the mapper walks: the
/// declared field names in order, a getter and a setter per field, and the
/// identity trailer pair. Implementors write the getters and setters
/// themselves, so private fields are reachable without any reflection
/// facility, and a type with no public constructor arguments still maps
/// (rebuild instantiates through [`crate::SchemaRegistry`] via `Default`).
pub trait Entity: Any {
    /// The type name, which is also the collection its documents live in.
    /// Case-sensitive; must not contain `::`.
    fn type_name(&self) -> &'static str;

    /// Declared field names, in declaration order. Identity trailers are
    /// not fields.
    fn field_names(&self) -> &'static [&'static str];

    /// Read one field's current value.
    fn field(&self, name: &str) -> Result<FieldValue, SchemaError>;

    /// Write one field. Fails if the name is undeclared or the value's
    /// shape does not fit the field.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError>;

    fn identity(&self) -> &Identity;

    fn identity_mut(&mut self) -> &mut Identity;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The assigned OID, if this composite has been persisted.
    fn oid(&self) -> Option<&Oid> {
        self.identity().oid.as_ref()
    }

    /// The last-known content hash from the most recent persist or fetch.
    fn content_hash(&self) -> Option<&ContentHash> {
        self.identity().hash.as_ref()
    }
}

// Prints identity only, never field values: a field may hold a handle back
// into a cyclic graph.
impl fmt::Debug for dyn Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("type_name", &self.type_name())
            .field("oid", &self.identity().oid)
            .finish_non_exhaustive()
    }
}

/// Borrow the concrete type behind an [`EntityRef`].
///
/// Returns `None` if the handle holds a different type.
pub fn borrow_as<T: Entity>(entity: &EntityRef) -> Option<Ref<'_, T>> {
    Ref::filter_map(entity.borrow(), |e| e.as_any().downcast_ref::<T>()).ok()
}

/// Mutably borrow the concrete type behind an [`EntityRef`].
pub fn borrow_as_mut<T: Entity>(entity: &EntityRef) -> Option<RefMut<'_, T>> {
    RefMut::filter_map(entity.borrow_mut(), |e| e.as_any_mut().downcast_mut::<T>()).ok()
}
