//! Book references to authors and publishers.
//!
//! The server returns a reference either as a bare id string or, when
//! populated, as a nested object with at least an id.

use crate::{Error, RecordId, ids};
use serde::{Deserialize, Deserializer, Serialize};

/// A foreign key from a book to an author or publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    /// Bare id string.
    Id(RecordId),
    /// Populated object.
    Embedded(EmbeddedRef),
}

/// Nested reference object. Fields other than the id are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmbeddedWire")]
pub struct EmbeddedRef {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddedWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(rename = "nombre", default)]
    name: Option<String>,
}

impl TryFrom<EmbeddedWire> for EmbeddedRef {
    type Error = Error;

    fn try_from(wire: EmbeddedWire) -> Result<Self, Error> {
        Ok(Self {
            id: ids::pick(wire.mongo_id, wire.id)?,
            name: wire.name,
        })
    }
}

impl Reference {
    /// The referenced record's id, regardless of representation.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Reference::Id(id) => id,
            Reference::Embedded(embedded) => &embedded.id,
        }
    }
}

impl From<RecordId> for Reference {
    fn from(id: RecordId) -> Self {
        Reference::Id(id)
    }
}

/// Deserializes an optional reference, treating `null` and `""` as absent.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Reference>, D::Error>
where
    D: Deserializer<'de>,
{
    let reference = Option::<Reference>::deserialize(deserializer)?;
    Ok(reference.filter(|r| !r.id().is_blank()))
}
