//! Strongly-typed record addressing.
//!
//! A record is addressed by a (type, id) pair. Both halves are opaque
//! strings assigned by the host application and its server; keeping them
//! as distinct newtypes prevents a bare id from being passed where a
//! fully-qualified key is required.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of a persisted record.
///
/// Records that have never been saved to the server have no `RecordId`;
/// see [`RouteRecord::persisted_id`](crate::record::RouteRecord::persisted_id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Type discriminator for a record, e.g. `"course"` or `"user"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Fully-qualified address of a record: a (type, id) pair.
///
/// A `RecordKey` cannot be constructed without both halves, so a lookup
/// can never silently cross record types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    type_name: TypeName,
    id: RecordId,
}

impl RecordKey {
    pub fn new(type_name: impl Into<TypeName>, id: impl Into<RecordId>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.id)
    }
}
