//! Core type definitions for the library catalog console.
//!
//! This crate defines the records exchanged with the catalog API:
//! - Server-assigned record identifiers
//! - Author, Publisher and Book records in their wire shape
//! - Book references to authors/publishers (bare id or nested object)
//!
//! No I/O happens here. Fetching, caching and editing live in `biblio-sync`.

mod date;
mod entity;
mod ids;
mod kind;
mod records;
mod reference;

pub use date::{calendar_date, parse_calendar_date};
pub use entity::Entity;
pub use ids::RecordId;
pub use kind::EntityKind;
pub use records::{Author, Book, Publisher};
pub use reference::{EmbeddedRef, Reference};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record id: {0:?}")]
    InvalidId(String),

    #[error("record has neither `_id` nor `id`")]
    MissingId,

    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
