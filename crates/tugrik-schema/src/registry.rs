use std::collections::HashMap;

use crate::entity::{entity_ref, Entity, EntityRef};
use crate::error::SchemaError;

type Constructor = fn() -> EntityRef;

/// Maps type names to zero-argument constructors.
///
/// The rebuilder resolves a fetched document's type name here to obtain a
/// zero-initialized composite to hydrate. Types are registered up front;
/// composites therefore must be constructible without caller-supplied
/// arguments (`Default`). An unregistered name is an unsupported-type
/// error at rebuild time.
#[derive(Default)]
pub struct SchemaRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a composite type under its declared type name.
    ///
    /// Re-registering a name replaces the previous constructor.
    pub fn register<T: Entity + Default>(&mut self) {
        let name = T::default().type_name();
        self.constructors.insert(name, || entity_ref(T::default()));
    }

    /// Instantiate a zero-initialized composite of the named type.
    pub fn instantiate(&self, type_name: &str) -> Result<EntityRef, SchemaError> {
        self.constructors
            .get(type_name)
            .map(|ctor| ctor())
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    /// Returns `true` if the type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
