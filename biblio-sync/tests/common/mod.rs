//! Shared test helpers: an in-memory catalog that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use biblio_sync::{ApiError, ApiResult, CatalogApi, Criterion};
use biblio_types::{Author, Book, Entity, EntityKind, Publisher, RecordId, Reference};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::Level;

/// Routes library logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One API call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(EntityKind),
    Create(EntityKind, Value),
    Update(EntityKind, RecordId, Value),
    Delete(EntityKind, RecordId),
    Search(Criterion),
    Report,
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Create(..) | Call::Update(..) | Call::Delete(..))
    }
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fail {
    List(EntityKind),
    Mutations,
    Search(Criterion),
    Report,
}

/// In-memory stand-in for the catalog server.
///
/// Mutations change the stored collections, so reloads observe them.
/// Searches compute their answer from the stored books unless an explicit
/// answer was set with [`MockCatalog::answer`].
#[derive(Default)]
pub struct MockCatalog {
    authors: Mutex<Vec<Author>>,
    publishers: Mutex<Vec<Publisher>>,
    books: Mutex<Vec<Book>>,
    answers: Mutex<HashMap<Criterion, Vec<RecordId>>>,
    failing: Mutex<HashSet<Fail>>,
    calls: Mutex<Vec<Call>>,
    hold: Mutex<Option<Arc<Notify>>>,
    next_id: AtomicU64,
    report: Vec<u8>,
}

impl MockCatalog {
    pub fn new() -> Self {
        init_tracing();
        Self {
            report: b"%PDF-1.4 report".to_vec(),
            ..Default::default()
        }
    }

    pub fn with_books(self, books: Vec<Book>) -> Self {
        *self.books.lock().unwrap() = books;
        self
    }

    pub fn with_authors(self, authors: Vec<Author>) -> Self {
        *self.authors.lock().unwrap() = authors;
        self
    }

    pub fn with_publishers(self, publishers: Vec<Publisher>) -> Self {
        *self.publishers.lock().unwrap() = publishers;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Fixes the answer of one search criterion.
    pub fn answer(&self, criterion: Criterion, ids: &[&str]) {
        self.answers
            .lock()
            .unwrap()
            .insert(criterion, ids.iter().map(|s| RecordId::new(*s)).collect());
    }

    pub fn fail(&self, what: Fail) {
        self.failing.lock().unwrap().insert(what);
    }

    pub fn recover(&self, what: &Fail) {
        self.failing.lock().unwrap().remove(what);
    }

    /// Makes mutations wait until the returned handle is notified.
    pub fn hold_mutations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn set_author_name(&self, id: &str, name: &str) {
        let mut authors = self.authors.lock().unwrap();
        if let Some(author) = authors.iter_mut().find(|a| a.id.as_str() == id) {
            author.name = name.to_string();
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    pub fn search_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Search(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, what: &Fail) -> ApiResult<()> {
        if self.failing.lock().unwrap().contains(what) {
            return Err(ApiError::Status {
                status: 500,
                body: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_if_held(&self) {
        let hold = self.hold.lock().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
    }

    fn fresh_id(&self) -> RecordId {
        RecordId::new(format!("new-{}", self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    fn store_record(&self, kind: EntityKind, id: RecordId, body: &Value) -> ApiResult<()> {
        let mut body = body.clone();
        if let Some(map) = body.as_object_mut() {
            map.insert("_id".into(), Value::String(id.to_string()));
        }
        let decode = |e: serde_json::Error| ApiError::Decode(e.to_string());
        match kind {
            EntityKind::Author => {
                let record: Author = serde_json::from_value(body).map_err(decode)?;
                upsert(&mut *self.authors.lock().unwrap(), record);
            }
            EntityKind::Publisher => {
                let record: Publisher = serde_json::from_value(body).map_err(decode)?;
                upsert(&mut *self.publishers.lock().unwrap(), record);
            }
            EntityKind::Book => {
                let record: Book = serde_json::from_value(body).map_err(decode)?;
                upsert(&mut *self.books.lock().unwrap(), record);
            }
        }
        Ok(())
    }
}

fn upsert<T: Entity>(records: &mut Vec<T>, record: T) {
    match records.iter().position(|r| r.id() == record.id()) {
        Some(i) => records[i] = record,
        None => records.push(record),
    }
}

fn satisfies(book: &Book, criterion: &Criterion) -> bool {
    let contains = |field: &str, text: &str| field.to_lowercase().contains(&text.to_lowercase());
    match criterion {
        Criterion::Title(text) => contains(&book.title, text),
        Criterion::Category(text) => book
            .category
            .as_deref()
            .is_some_and(|c| contains(c, text)),
        Criterion::Availability(flag) => book.available == *flag,
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn list_authors(&self) -> ApiResult<Vec<Author>> {
        self.record(Call::List(EntityKind::Author));
        self.check(&Fail::List(EntityKind::Author))?;
        Ok(self.authors.lock().unwrap().clone())
    }

    async fn list_publishers(&self) -> ApiResult<Vec<Publisher>> {
        self.record(Call::List(EntityKind::Publisher));
        self.check(&Fail::List(EntityKind::Publisher))?;
        Ok(self.publishers.lock().unwrap().clone())
    }

    async fn list_books(&self) -> ApiResult<Vec<Book>> {
        self.record(Call::List(EntityKind::Book));
        self.check(&Fail::List(EntityKind::Book))?;
        Ok(self.books.lock().unwrap().clone())
    }

    async fn create(&self, kind: EntityKind, body: &Value) -> ApiResult<()> {
        self.record(Call::Create(kind, body.clone()));
        self.wait_if_held().await;
        self.check(&Fail::Mutations)?;
        let id = self.fresh_id();
        self.store_record(kind, id, body)
    }

    async fn update(&self, kind: EntityKind, id: &RecordId, body: &Value) -> ApiResult<()> {
        self.record(Call::Update(kind, id.clone(), body.clone()));
        self.wait_if_held().await;
        self.check(&Fail::Mutations)?;
        self.store_record(kind, id.clone(), body)
    }

    async fn delete(&self, kind: EntityKind, id: &RecordId) -> ApiResult<()> {
        self.record(Call::Delete(kind, id.clone()));
        self.wait_if_held().await;
        self.check(&Fail::Mutations)?;
        match kind {
            EntityKind::Author => self.authors.lock().unwrap().retain(|a| &a.id != id),
            EntityKind::Publisher => self.publishers.lock().unwrap().retain(|p| &p.id != id),
            EntityKind::Book => self.books.lock().unwrap().retain(|b| &b.id != id),
        }
        Ok(())
    }

    async fn search_books(&self, criterion: &Criterion) -> ApiResult<Vec<Book>> {
        self.record(Call::Search(criterion.clone()));
        self.check(&Fail::Search(criterion.clone()))?;
        if let Some(ids) = self.answers.lock().unwrap().get(criterion) {
            return Ok(ids.iter().map(|id| Book::new(id.clone(), "")).collect());
        }
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|b| satisfies(b, criterion))
            .cloned()
            .collect())
    }

    async fn download_report(&self) -> ApiResult<Vec<u8>> {
        self.record(Call::Report);
        self.check(&Fail::Report)?;
        Ok(self.report.clone())
    }
}

// ── Fixtures ────────────────────────────────────────────────────

pub fn author(id: &str, name: &str) -> Author {
    Author {
        id: RecordId::new(id),
        name: name.to_string(),
        nationality: None,
        birth_date: None,
    }
}

pub fn publisher(id: &str, name: &str) -> Publisher {
    Publisher {
        id: RecordId::new(id),
        name: name.to_string(),
        country: None,
        founded: None,
    }
}

pub fn book(id: &str, title: &str) -> Book {
    Book::new(id, title)
}

pub fn book_by(id: &str, title: &str, author_id: &str) -> Book {
    let mut book = Book::new(id, title);
    book.author = Some(Reference::Id(RecordId::new(author_id)));
    book
}

pub fn ids(raw: &[&str]) -> Vec<RecordId> {
    raw.iter().map(|s| RecordId::new(*s)).collect()
}

/// Book store from the filtering examples: Dune, Dune Messiah, Foundation.
pub fn dune_books() -> Vec<Book> {
    vec![
        book("1", "Dune"),
        book("2", "Dune Messiah"),
        book("3", "Foundation"),
    ]
}
