//! Test entity types shared across this crate's test modules.

use std::any::Any;

use tugrik_schema::{entity_ref, Entity, EntityRef, FieldValue, Identity, Scalar, SchemaError};

fn unknown_field(type_name: &str, field: &str) -> SchemaError {
    SchemaError::UnknownField {
        type_name: type_name.into(),
        field: field.into(),
    }
}

fn field_type(type_name: &str, field: &str, given: &'static str) -> SchemaError {
    SchemaError::FieldType {
        type_name: type_name.into(),
        field: field.into(),
        given,
    }
}

/// `Address{city}` — the leaf composite from the Person/Address example.
#[derive(Default)]
pub(crate) struct Address {
    pub city: String,
    identity: Identity,
}

impl Entity for Address {
    fn type_name(&self) -> &'static str {
        "Address"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["city"]
    }

    fn field(&self, name: &str) -> Result<FieldValue, SchemaError> {
        match name {
            "city" => Ok(FieldValue::string(self.city.clone())),
            _ => Err(unknown_field("Address", name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match (name, value) {
            ("city", FieldValue::Scalar(Scalar::String(s))) => {
                self.city = s;
                Ok(())
            }
            ("city", other) => Err(field_type("Address", name, other.kind())),
            _ => Err(unknown_field("Address", name)),
        }
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// `Person{name, nicknames, address}` — scalar, sequence, and reference
/// fields in one type.
#[derive(Default)]
pub(crate) struct Person {
    pub name: String,
    pub nicknames: Vec<String>,
    pub address: Option<EntityRef>,
    identity: Identity,
}

impl Entity for Person {
    fn type_name(&self) -> &'static str {
        "Person"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "nicknames", "address"]
    }

    fn field(&self, name: &str) -> Result<FieldValue, SchemaError> {
        match name {
            "name" => Ok(FieldValue::string(self.name.clone())),
            "nicknames" => Ok(FieldValue::Sequence(
                self.nicknames
                    .iter()
                    .map(|n| FieldValue::string(n.clone()))
                    .collect(),
            )),
            "address" => Ok(match &self.address {
                Some(address) => FieldValue::Composite(address.clone()),
                None => FieldValue::Scalar(Scalar::Null),
            }),
            _ => Err(unknown_field("Person", name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match (name, value) {
            ("name", FieldValue::Scalar(Scalar::String(s))) => self.name = s,
            ("nicknames", FieldValue::Sequence(elements)) => {
                self.nicknames = elements
                    .into_iter()
                    .map(|el| match el {
                        FieldValue::Scalar(Scalar::String(s)) => Ok(s),
                        other => Err(field_type("Person", name, other.kind())),
                    })
                    .collect::<Result<_, _>>()?;
            }
            ("address", FieldValue::Composite(entity)) => self.address = Some(entity),
            ("address", FieldValue::Scalar(Scalar::Null)) => self.address = None,
            ("name" | "nicknames" | "address", other) => {
                return Err(field_type("Person", name, other.kind()))
            }
            _ => return Err(unknown_field("Person", name)),
        }
        Ok(())
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// `Team{name, members}` — a sequence of composites.
#[derive(Default)]
pub(crate) struct Team {
    pub name: String,
    pub members: Vec<EntityRef>,
    identity: Identity,
}

impl Entity for Team {
    fn type_name(&self) -> &'static str {
        "Team"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "members"]
    }

    fn field(&self, name: &str) -> Result<FieldValue, SchemaError> {
        match name {
            "name" => Ok(FieldValue::string(self.name.clone())),
            "members" => Ok(FieldValue::Sequence(
                self.members
                    .iter()
                    .map(|m| FieldValue::Composite(m.clone()))
                    .collect(),
            )),
            _ => Err(unknown_field("Team", name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match (name, value) {
            ("name", FieldValue::Scalar(Scalar::String(s))) => self.name = s,
            ("members", FieldValue::Sequence(elements)) => {
                self.members = elements
                    .into_iter()
                    .map(|el| match el {
                        FieldValue::Composite(entity) => Ok(entity),
                        other => Err(field_type("Team", name, other.kind())),
                    })
                    .collect::<Result<_, _>>()?;
            }
            ("name" | "members", other) => return Err(field_type("Team", name, other.kind())),
            _ => return Err(unknown_field("Team", name)),
        }
        Ok(())
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// `Node{label, next}` — for cyclic graphs.
#[derive(Default)]
pub(crate) struct Node {
    pub label: String,
    pub next: Option<EntityRef>,
    identity: Identity,
}

impl Entity for Node {
    fn type_name(&self) -> &'static str {
        "Node"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["label", "next"]
    }

    fn field(&self, name: &str) -> Result<FieldValue, SchemaError> {
        match name {
            "label" => Ok(FieldValue::string(self.label.clone())),
            "next" => Ok(match &self.next {
                Some(next) => FieldValue::Composite(next.clone()),
                None => FieldValue::Scalar(Scalar::Null),
            }),
            _ => Err(unknown_field("Node", name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match (name, value) {
            ("label", FieldValue::Scalar(Scalar::String(s))) => self.label = s,
            ("next", FieldValue::Composite(entity)) => self.next = Some(entity),
            ("next", FieldValue::Scalar(Scalar::Null)) => self.next = None,
            ("label" | "next", other) => return Err(field_type("Node", name, other.kind())),
            _ => return Err(unknown_field("Node", name)),
        }
        Ok(())
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// `Metric{label, value, samples}` — float scalars and a float sequence.
#[derive(Default)]
pub(crate) struct Metric {
    pub label: String,
    pub value: f64,
    pub samples: Vec<f64>,
    identity: Identity,
}

impl Entity for Metric {
    fn type_name(&self) -> &'static str {
        "Metric"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["label", "value", "samples"]
    }

    fn field(&self, name: &str) -> Result<FieldValue, SchemaError> {
        match name {
            "label" => Ok(FieldValue::string(self.label.clone())),
            "value" => Ok(FieldValue::Scalar(Scalar::Float(self.value))),
            "samples" => Ok(FieldValue::Sequence(
                self.samples
                    .iter()
                    .map(|s| FieldValue::Scalar(Scalar::Float(*s)))
                    .collect(),
            )),
            _ => Err(unknown_field("Metric", name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match (name, value) {
            ("label", FieldValue::Scalar(Scalar::String(s))) => self.label = s,
            ("value", FieldValue::Scalar(Scalar::Float(f))) => self.value = f,
            ("samples", FieldValue::Sequence(elements)) => {
                self.samples = elements
                    .into_iter()
                    .map(|el| match el {
                        FieldValue::Scalar(Scalar::Float(f)) => Ok(f),
                        other => Err(field_type("Metric", name, other.kind())),
                    })
                    .collect::<Result<_, _>>()?;
            }
            ("label" | "value" | "samples", other) => {
                return Err(field_type("Metric", name, other.kind()))
            }
            _ => return Err(unknown_field("Metric", name)),
        }
        Ok(())
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn address(city: &str) -> EntityRef {
    entity_ref(Address {
        city: city.into(),
        ..Default::default()
    })
}

pub(crate) fn person(name: &str, nicknames: &[&str], address: Option<EntityRef>) -> EntityRef {
    entity_ref(Person {
        name: name.into(),
        nicknames: nicknames.iter().map(|n| (*n).to_string()).collect(),
        address,
        ..Default::default()
    })
}

pub(crate) fn team(name: &str, members: Vec<EntityRef>) -> EntityRef {
    entity_ref(Team {
        name: name.into(),
        members,
        ..Default::default()
    })
}

pub(crate) fn metric(label: &str, value: f64, samples: &[f64]) -> EntityRef {
    entity_ref(Metric {
        label: label.into(),
        value,
        samples: samples.to_vec(),
        ..Default::default()
    })
}

pub(crate) fn node(label: &str) -> EntityRef {
    entity_ref(Node {
        label: label.into(),
        ..Default::default()
    })
}

pub(crate) fn set_address(person: &EntityRef, address: EntityRef) {
    person
        .borrow_mut()
        .set_field("address", FieldValue::Composite(address))
        .unwrap();
}

pub(crate) fn set_next(node: &EntityRef, next: EntityRef) {
    node.borrow_mut()
        .set_field("next", FieldValue::Composite(next))
        .unwrap();
}
