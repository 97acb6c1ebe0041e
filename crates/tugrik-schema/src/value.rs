use tugrik_types::DocValue;

use crate::entity::EntityRef;

/// A scalar field value: the shapes that inline directly into a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// The document form of this scalar.
    pub fn to_doc_value(&self) -> DocValue {
        match self {
            Scalar::Null => DocValue::Null,
            Scalar::Bool(b) => DocValue::Bool(*b),
            Scalar::Int(i) => DocValue::Int(*i),
            Scalar::Float(f) => DocValue::Float(*f),
            Scalar::String(s) => DocValue::String(s.clone()),
        }
    }

    /// Recover a scalar from its document form. Subdocuments are not scalars.
    pub fn from_doc_value(value: &DocValue) -> Option<Self> {
        match value {
            DocValue::Null => Some(Scalar::Null),
            DocValue::Bool(b) => Some(Scalar::Bool(*b)),
            DocValue::Int(i) => Some(Scalar::Int(*i)),
            DocValue::Float(f) => Some(Scalar::Float(*f)),
            DocValue::String(s) => Some(Scalar::String(s.clone())),
            DocValue::Doc(_) => None,
        }
    }
}

/// Classification of one field value, consumed uniformly by the flattener
/// and the rebuilder.
///
/// - `Scalar` inlines as-is.
/// - `Sequence` inlines structurally, element by element.
/// - `Composite` becomes a separate stored document plus a pointer marker
///   at the reference site.
#[derive(Clone)]
pub enum FieldValue {
    Scalar(Scalar),
    Sequence(Vec<FieldValue>),
    Composite(EntityRef),
}

impl FieldValue {
    /// Short human-readable name of this value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Scalar(Scalar::Null) => "null",
            FieldValue::Scalar(Scalar::Bool(_)) => "bool",
            FieldValue::Scalar(Scalar::Int(_)) => "int",
            FieldValue::Scalar(Scalar::Float(_)) => "float",
            FieldValue::Scalar(Scalar::String(_)) => "string",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Composite(_) => "composite",
        }
    }

    /// Convenience constructor for string scalars.
    pub fn string(s: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::String(s.into()))
    }

    /// Convenience constructor for integer scalars.
    pub fn int(i: i64) -> Self {
        FieldValue::Scalar(Scalar::Int(i))
    }
}

impl std::fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Scalar(s) => write!(f, "Scalar({s:?})"),
            FieldValue::Sequence(els) => f.debug_tuple("Sequence").field(&els.len()).finish(),
            FieldValue::Composite(e) => {
                write!(f, "Composite({})", e.borrow().type_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_doc_value_roundtrip() {
        let scalars = [
            Scalar::Null,
            Scalar::Bool(true),
            Scalar::Int(-7),
            Scalar::Float(2.5),
            Scalar::String("Oslo".into()),
        ];
        for s in scalars {
            assert_eq!(Scalar::from_doc_value(&s.to_doc_value()), Some(s));
        }
    }

    #[test]
    fn subdocument_is_not_a_scalar() {
        let doc = DocValue::Doc(tugrik_types::Document::new());
        assert_eq!(Scalar::from_doc_value(&doc), None);
    }

    #[test]
    fn kind_names() {
        assert_eq!(FieldValue::string("x").kind(), "string");
        assert_eq!(FieldValue::int(1).kind(), "int");
        assert_eq!(FieldValue::Sequence(vec![]).kind(), "sequence");
    }
}
