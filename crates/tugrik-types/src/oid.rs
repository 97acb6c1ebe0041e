use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Separator between the type name and the token in an OID string.
pub const OID_SEPARATOR: &str = "::";

/// Type-scoped object identifier.
///
/// An `Oid` names one stored composite: `TypeName::token`. The type name
/// doubles as the collection the document lives in (case-sensitive), and the
/// token is unique within that collection. Once assigned to a composite the
/// OID never changes.
///
/// Tokens are UUID v7 values rendered as 32 lowercase hex characters, large
/// enough that collisions within one collection are negligible.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid {
    type_name: String,
    token: String,
}

impl Oid {
    /// Mint a fresh OID for the given type name.
    pub fn mint(type_name: &str) -> Result<Self, TypeError> {
        validate_type_name(type_name)?;
        Ok(Self {
            type_name: type_name.to_string(),
            token: Uuid::now_v7().simple().to_string(),
        })
    }

    /// Parse an OID from its `TypeName::token` string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (type_name, token) = s
            .split_once(OID_SEPARATOR)
            .ok_or_else(|| TypeError::MalformedOid(s.to_string()))?;
        if token.is_empty() || token.contains(OID_SEPARATOR) {
            return Err(TypeError::MalformedOid(s.to_string()));
        }
        validate_type_name(type_name).map_err(|_| TypeError::MalformedOid(s.to_string()))?;
        Ok(Self {
            type_name: type_name.to_string(),
            token: token.to_string(),
        })
    }

    /// The type name prefix. Also the collection this OID's document lives in.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The token part, unique within the type's collection.
    pub fn token(&self) -> &str {
        &self.token
    }
}

fn validate_type_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() || name.contains(OID_SEPARATOR) {
        return Err(TypeError::InvalidTypeName(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.type_name, OID_SEPARATOR, self.token)
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({self})")
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.to_string()
    }
}
