use serde::{Deserialize, Serialize};
use std::fmt;

/// The three collections exposed by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Publisher,
    Book,
}

impl EntityKind {
    /// All kinds, in the order the console loads them.
    pub const ALL: [EntityKind; 3] = [EntityKind::Author, EntityKind::Publisher, EntityKind::Book];

    /// Resource segment under the API base path.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            EntityKind::Author => "autores",
            EntityKind::Publisher => "editoriales",
            EntityKind::Book => "libros",
        }
    }

    /// Singular human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Author => "author",
            EntityKind::Publisher => "publisher",
            EntityKind::Book => "book",
        }
    }

    /// Plural human-readable label.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Publisher => "publishers",
            EntityKind::Book => "books",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
