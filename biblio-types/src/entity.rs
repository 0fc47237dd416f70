use crate::{EntityKind, RecordId};

/// A record held in one of the catalog collections.
///
/// Every stored record has a server-assigned identity and a required
/// display name (`nombre` for authors/publishers, `titulo` for books).
pub trait Entity: Clone + Send + Sync + 'static {
    /// Which collection this record type belongs to.
    const KIND: EntityKind;

    /// The server-assigned identity.
    fn id(&self) -> &RecordId;

    /// The required name/title field.
    fn display_name(&self) -> &str;
}
