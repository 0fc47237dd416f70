mod common;

use biblio_sync::{CatalogError, EntityStore};
use biblio_types::{Author, Book, EntityKind, RecordId};
use common::{Fail, MockCatalog, author, book, dune_books, ids};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn load_replaces_contents() {
    let api = MockCatalog::new().with_books(dune_books());
    let mut store = EntityStore::from_records(vec![book("old", "Stale")]);

    let count = store.load(&api).await.unwrap();

    assert_eq!(count, 3);
    assert!(store.is_loaded());
    assert!(!store.contains(&RecordId::new("old")));
    assert_eq!(store.ids().cloned().collect::<Vec<_>>(), ids(&["1", "2", "3"]));
}

#[tokio::test]
async fn failed_load_keeps_previous_snapshot() {
    let api = MockCatalog::new().with_authors(vec![author("a1", "Le Guin")]);
    let mut store: EntityStore<Author> = EntityStore::new();
    store.load(&api).await.unwrap();

    api.fail(Fail::List(EntityKind::Author));
    let err = store.load(&api).await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Load {
            kind: EntityKind::Author,
            ..
        }
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&RecordId::new("a1")).unwrap().name, "Le Guin");
}

#[tokio::test]
async fn snapshot_is_unaffected_by_later_load() {
    let api = MockCatalog::new().with_books(dune_books());
    let mut store: EntityStore<Book> = EntityStore::new();
    store.load(&api).await.unwrap();
    let before = store.snapshot();

    let api = MockCatalog::new().with_books(vec![book("9", "Solaris")]);
    store.load(&api).await.unwrap();

    assert_eq!(before.len(), 3);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn load_of_empty_collection_is_loaded_and_empty() {
    let api = MockCatalog::new();
    let mut store: EntityStore<Book> = EntityStore::new();
    assert!(!store.is_loaded());

    assert_eq!(store.load(&api).await.unwrap(), 0);
    assert!(store.is_loaded());
    assert!(store.is_empty());
}

#[test]
fn lookup_of_missing_id_is_not_found() {
    let store = EntityStore::from_records(dune_books());
    assert!(matches!(
        store.lookup(&RecordId::new("42")),
        Err(CatalogError::NotFound(_))
    ));
}
