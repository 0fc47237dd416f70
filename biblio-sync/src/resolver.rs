//! Resolves book references to display names at render time.

use crate::store::EntityStore;
use biblio_types::{Author, Book, Entity, Publisher, RecordId, Reference};

/// Shown when a referenced author is not in the author store.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Shown when a referenced publisher is not in the publisher store.
pub const UNKNOWN_PUBLISHER: &str = "Unknown publisher";

/// Sentinel used by [`resolve_name`] for any record type.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Name of the record with `id`, or [`UNKNOWN_NAME`] if the store lacks it.
pub fn resolve_name<'a, E: Entity>(store: &'a EntityStore<E>, id: &RecordId) -> &'a str {
    resolve_or(store, id, UNKNOWN_NAME)
}

/// Name for a reference in either wire representation.
pub fn resolve_reference<'a, E: Entity>(
    store: &'a EntityStore<E>,
    reference: &Reference,
) -> &'a str {
    resolve_name(store, reference.id())
}

fn resolve_or<'a, E: Entity>(
    store: &'a EntityStore<E>,
    id: &RecordId,
    unknown: &'static str,
) -> &'a str {
    store.get(id).map_or(unknown, Entity::display_name)
}

/// Read-only view over the author and publisher stores.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    pub authors: &'a EntityStore<Author>,
    pub publishers: &'a EntityStore<Publisher>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(authors: &'a EntityStore<Author>, publishers: &'a EntityStore<Publisher>) -> Self {
        Self {
            authors,
            publishers,
        }
    }

    /// Author name for a book; `None` when the book has no author.
    pub fn author_name(&self, book: &Book) -> Option<&'a str> {
        book.author_id()
            .map(|id| resolve_or(self.authors, id, UNKNOWN_AUTHOR))
    }

    /// Publisher name for a book; `None` when the book has no publisher.
    pub fn publisher_name(&self, book: &Book) -> Option<&'a str> {
        book.publisher_id()
            .map(|id| resolve_or(self.publishers, id, UNKNOWN_PUBLISHER))
    }
}
