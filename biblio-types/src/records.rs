//! Catalog records in their wire shape.
//!
//! Field names follow the server's JSON (`nombre`, `titulo`, ...). The identity
//! is read from `_id`, falling back to `id`; documents carrying both keys are
//! accepted. Records serialize with `_id`.

use crate::reference::{self, Reference};
use crate::{Entity, EntityKind, Error, RecordId, date, ids};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// An author record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AuthorWire")]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nacionalidad", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Raw server value, usually an ISO datetime.
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Author {
    /// The birth date as a calendar date, if present and well formed.
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
            .as_deref()
            .and_then(|raw| date::parse_calendar_date(raw).ok())
    }
}

impl Entity for Author {
    const KIND: EntityKind = EntityKind::Author;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// A publisher record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PublisherWire")]
pub struct Publisher {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "pais", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "anioFundacion", skip_serializing_if = "Option::is_none")]
    pub founded: Option<i32>,
}

impl Entity for Publisher {
    const KIND: EntityKind = EntityKind::Publisher;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// A book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookWire")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "anio", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "disponible")]
    pub available: bool,
    #[serde(rename = "autor", skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,
    #[serde(rename = "editorial", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Reference>,
}

impl Book {
    /// Creates an available book with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            year: None,
            available: true,
            author: None,
            publisher: None,
        }
    }

    /// Id of the referenced author, if any.
    #[must_use]
    pub fn author_id(&self) -> Option<&RecordId> {
        self.author.as_ref().map(Reference::id)
    }

    /// Id of the referenced publisher, if any.
    #[must_use]
    pub fn publisher_id(&self) -> Option<&RecordId> {
        self.publisher.as_ref().map(Reference::id)
    }
}

impl Entity for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}

// Incoming shapes. `_id` and `id` are separate keys so a document may carry
// both.

#[derive(Deserialize)]
struct AuthorWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "nacionalidad", default, deserialize_with = "non_empty")]
    nationality: Option<String>,
    #[serde(rename = "fechaNacimiento", default, deserialize_with = "non_empty")]
    birth_date: Option<String>,
}

impl TryFrom<AuthorWire> for Author {
    type Error = Error;

    fn try_from(wire: AuthorWire) -> Result<Self, Error> {
        Ok(Self {
            id: ids::pick(wire.mongo_id, wire.id)?,
            name: wire.name,
            nationality: wire.nationality,
            birth_date: wire.birth_date,
        })
    }
}

#[derive(Deserialize)]
struct PublisherWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "pais", default, deserialize_with = "non_empty")]
    country: Option<String>,
    #[serde(rename = "anioFundacion", default)]
    founded: Option<i32>,
}

impl TryFrom<PublisherWire> for Publisher {
    type Error = Error;

    fn try_from(wire: PublisherWire) -> Result<Self, Error> {
        Ok(Self {
            id: ids::pick(wire.mongo_id, wire.id)?,
            name: wire.name,
            country: wire.country,
            founded: wire.founded,
        })
    }
}

#[derive(Deserialize)]
struct BookWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(rename = "titulo")]
    title: String,
    #[serde(rename = "categoria", default, deserialize_with = "non_empty")]
    category: Option<String>,
    #[serde(rename = "anio", default)]
    year: Option<i32>,
    #[serde(rename = "disponible", default = "available_default", deserialize_with = "available")]
    available: bool,
    #[serde(rename = "autor", default, deserialize_with = "reference::deserialize_optional")]
    author: Option<Reference>,
    #[serde(rename = "editorial", default, deserialize_with = "reference::deserialize_optional")]
    publisher: Option<Reference>,
}

impl TryFrom<BookWire> for Book {
    type Error = Error;

    fn try_from(wire: BookWire) -> Result<Self, Error> {
        Ok(Self {
            id: ids::pick(wire.mongo_id, wire.id)?,
            title: wire.title,
            category: wire.category,
            year: wire.year,
            available: wire.available,
            author: wire.author,
            publisher: wire.publisher,
        })
    }
}

fn available_default() -> bool {
    true
}

// `null` reads as the default (available).
fn available<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
