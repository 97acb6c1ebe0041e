/// Errors from the schema interface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A getter or setter was asked for a field the type does not declare.
    #[error("type {type_name} has no field {field:?}")]
    UnknownField { type_name: String, field: String },

    /// A setter was handed a value whose shape does not match the field.
    #[error("field {field:?} of {type_name} cannot hold a {given} value")]
    FieldType {
        type_name: String,
        field: String,
        given: &'static str,
    },

    /// The type name is not registered, so it cannot be instantiated.
    #[error("unregistered type: {0}")]
    UnknownType(String),
}
