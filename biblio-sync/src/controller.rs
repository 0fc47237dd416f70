//! Sync controller: owns the stores, forms and filter of the console.
//!
//! The controller is the only place that talks to the API on behalf of
//! the views. It loads all stores on activation, reloads a store after every
//! successful mutation of its collection, and turns every failure into a
//! notice instead of aborting.

use crate::api::{CatalogApi, Listable};
use crate::config::ClientConfig;
use crate::draft::{AuthorDraft, BookDraft, Draft, FieldValue, PublisherDraft};
use crate::error::{ApiResult, CatalogError, CatalogResult, MutationAction};
use crate::filter::{FilterCriteria, FilterEngine};
use crate::http::HttpCatalogApi;
use crate::loading::{LoadingState, Tab};
use crate::notice::NoticeBoard;
use crate::resolver::ReferenceResolver;
use crate::session::{EditSession, SubmitOutcome};
use crate::store::EntityStore;
use biblio_types::{Author, Book, Entity, EntityKind, Publisher, RecordId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A collection managed by the controller, with its store and form.
pub trait Collection: Listable {
    type Draft: Draft<Record = Self>;

    fn store(ctl: &SyncController) -> &EntityStore<Self>;
    fn store_mut(ctl: &mut SyncController) -> &mut EntityStore<Self>;
    fn session(ctl: &SyncController) -> &EditSession<Self::Draft>;
    fn session_mut(ctl: &mut SyncController) -> &mut EditSession<Self::Draft>;
}

impl Collection for Author {
    type Draft = AuthorDraft;

    fn store(ctl: &SyncController) -> &EntityStore<Self> {
        &ctl.authors
    }
    fn store_mut(ctl: &mut SyncController) -> &mut EntityStore<Self> {
        &mut ctl.authors
    }
    fn session(ctl: &SyncController) -> &EditSession<AuthorDraft> {
        &ctl.author_form
    }
    fn session_mut(ctl: &mut SyncController) -> &mut EditSession<AuthorDraft> {
        &mut ctl.author_form
    }
}

impl Collection for Publisher {
    type Draft = PublisherDraft;

    fn store(ctl: &SyncController) -> &EntityStore<Self> {
        &ctl.publishers
    }
    fn store_mut(ctl: &mut SyncController) -> &mut EntityStore<Self> {
        &mut ctl.publishers
    }
    fn session(ctl: &SyncController) -> &EditSession<PublisherDraft> {
        &ctl.publisher_form
    }
    fn session_mut(ctl: &mut SyncController) -> &mut EditSession<PublisherDraft> {
        &mut ctl.publisher_form
    }
}

impl Collection for Book {
    type Draft = BookDraft;

    fn store(ctl: &SyncController) -> &EntityStore<Self> {
        &ctl.books
    }
    fn store_mut(ctl: &mut SyncController) -> &mut EntityStore<Self> {
        &mut ctl.books
    }
    fn session(ctl: &SyncController) -> &EditSession<BookDraft> {
        &ctl.book_form
    }
    fn session_mut(ctl: &mut SyncController) -> &mut EditSession<BookDraft> {
        &mut ctl.book_form
    }
}

/// Outcome of loading all three stores.
#[derive(Debug)]
pub struct LoadReport {
    pub authors: CatalogResult<usize>,
    pub publishers: CatalogResult<usize>,
    pub books: CatalogResult<usize>,
}

impl LoadReport {
    pub fn all_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CatalogError> {
        [&self.authors, &self.publishers, &self.books]
            .into_iter()
            .filter_map(|r| r.as_ref().err())
    }
}

/// One rendered line of the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub id: RecordId,
    pub title: String,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub available: bool,
    pub author: Option<String>,
    pub publisher: Option<String>,
}

/// Owns the console state and coordinates every API call.
pub struct SyncController {
    api: Arc<dyn CatalogApi>,
    authors: EntityStore<Author>,
    publishers: EntityStore<Publisher>,
    books: EntityStore<Book>,
    author_form: EditSession<AuthorDraft>,
    publisher_form: EditSession<PublisherDraft>,
    book_form: EditSession<BookDraft>,
    filter: FilterEngine,
    loading: LoadingState,
    notices: NoticeBoard,
    last_errors: HashMap<Tab, String>,
}

impl SyncController {
    /// Creates a controller over any API implementation.
    pub fn new(api: Arc<dyn CatalogApi>, config: &ClientConfig) -> Self {
        Self {
            api,
            authors: EntityStore::new(),
            publishers: EntityStore::new(),
            books: EntityStore::new(),
            author_form: EditSession::new(),
            publisher_form: EditSession::new(),
            book_form: EditSession::new(),
            filter: FilterEngine::new(),
            loading: LoadingState::new(),
            notices: NoticeBoard::new(config.notice_ttl()),
            last_errors: HashMap::new(),
        }
    }

    /// Creates a controller talking HTTP to `config.base_url`.
    pub fn connect(config: &ClientConfig) -> ApiResult<Self> {
        let api = HttpCatalogApi::new(config.clone())?;
        Ok(Self::new(Arc::new(api), config))
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn authors(&self) -> &EntityStore<Author> {
        &self.authors
    }

    pub fn publishers(&self) -> &EntityStore<Publisher> {
        &self.publishers
    }

    pub fn books(&self) -> &EntityStore<Book> {
        &self.books
    }

    pub fn store<E: Collection>(&self) -> &EntityStore<E> {
        E::store(self)
    }

    pub fn session<E: Collection>(&self) -> &EditSession<E::Draft> {
        E::session(self)
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    /// A handle renderers can poll while operations are in flight.
    pub fn loading(&self) -> LoadingState {
        self.loading.clone()
    }

    pub fn is_loading(&self, tab: Tab) -> bool {
        self.loading.is_loading(tab)
    }

    pub fn notices(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// The last failure shown inline in a view, cleared by the next success.
    pub fn last_error(&self, tab: Tab) -> Option<&str> {
        self.last_errors.get(&tab).map(String::as_str)
    }

    pub fn resolver(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(&self.authors, &self.publishers)
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Loads all three stores concurrently.
    ///
    /// Failures are independent: a store that fails keeps its previous
    /// contents while the others are still replaced.
    pub async fn activate(&mut self) -> LoadReport {
        let api = Arc::clone(&self.api);
        let loading = self.loading.clone();
        let (authors, publishers, books) = tokio::join!(
            load_flagged(&loading, &mut self.authors, &*api),
            load_flagged(&loading, &mut self.publishers, &*api),
            load_flagged(&loading, &mut self.books, &*api),
        );

        let report = LoadReport {
            authors,
            publishers,
            books,
        };
        for (kind, result) in EntityKind::ALL
            .into_iter()
            .zip([&report.authors, &report.publishers, &report.books])
        {
            self.record_load(kind, result);
        }
        info!(
            "activated: {} authors, {} publishers, {} books",
            self.authors.len(),
            self.publishers.len(),
            self.books.len()
        );
        report
    }

    /// Reloads one collection's store.
    pub async fn reload<E: Collection>(&mut self) -> CatalogResult<usize> {
        let api = Arc::clone(&self.api);
        let loading = self.loading.clone();
        let result = load_flagged(&loading, E::store_mut(self), &*api).await;
        self.record_load(E::KIND, &result);
        result
    }

    fn record_load(&mut self, kind: EntityKind, result: &CatalogResult<usize>) {
        let tab = Tab::for_kind(kind);
        match result {
            Ok(_) => {
                self.last_errors.remove(&tab);
            }
            Err(err) => self.report_failure(tab, err),
        }
    }

    fn report_failure(&mut self, tab: Tab, err: &CatalogError) {
        self.notices.error(err);
        if !err.is_local() {
            self.last_errors.insert(tab, err.to_string());
        }
    }

    fn ensure_idle(&mut self, tab: Tab) -> CatalogResult<()> {
        if self.loading.is_loading(tab) {
            let err = CatalogError::Busy(tab);
            self.notices.error(&err);
            return Err(err);
        }
        Ok(())
    }

    // ── Forms ────────────────────────────────────────────────────

    /// Opens a blank form for a new record.
    pub fn start_create<E: Collection>(&mut self) {
        E::session_mut(self).start_create();
    }

    /// Opens the form on a stored record.
    pub fn start_edit<E: Collection>(&mut self, id: &RecordId) -> CatalogResult<()> {
        let record = match E::store(self).lookup(id) {
            Ok(record) => record.clone(),
            Err(err) => {
                self.notices.error(&err);
                return Err(err);
            }
        };
        E::session_mut(self).start_edit(&record);
        self.notices.info(
            format!("Editing {}", E::KIND),
            format!("You are editing \"{}\".", record.display_name()),
        );
        Ok(())
    }

    pub fn update_field<E: Collection>(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> CatalogResult<()> {
        E::session_mut(self).update_field(name, value)
    }

    /// Discards the open draft.
    pub fn cancel<E: Collection>(&mut self) {
        E::session_mut(self).cancel();
        self.notices
            .info("Edit cancelled", format!("No changes were made to the {}.", E::KIND));
    }

    /// Submits the open draft and reloads the collection on success.
    ///
    /// A failed reload after a successful save is reported as a notice; the
    /// submit itself still succeeds.
    pub async fn submit<E: Collection>(&mut self) -> CatalogResult<SubmitOutcome> {
        let tab = Tab::for_kind(E::KIND);
        self.ensure_idle(tab)?;

        let api = Arc::clone(&self.api);
        let result = {
            let _guard = self.loading.begin(tab);
            E::session_mut(self).submit(&*api).await
        };

        match result {
            Ok(outcome) => {
                self.last_errors.remove(&tab);
                let verb = match outcome {
                    SubmitOutcome::Created => "added",
                    SubmitOutcome::Updated(_) => "updated",
                };
                self.notices
                    .success(format!("{} {verb}", capitalized(E::KIND)), "");
                if let Err(err) = self.reload::<E>().await {
                    debug!("reload of {} after save failed: {err}", E::KIND.plural());
                }
                Ok(outcome)
            }
            Err(err) => {
                self.report_failure(tab, &err);
                Err(err)
            }
        }
    }

    /// Deletes a record and reloads its collection.
    ///
    /// If the deleted record is open in the form, the form is closed.
    pub async fn delete<E: Collection>(&mut self, id: &RecordId) -> CatalogResult<()> {
        let tab = Tab::for_kind(E::KIND);
        self.ensure_idle(tab)?;

        let api = Arc::clone(&self.api);
        let result = {
            let _guard = self.loading.begin(tab);
            api.delete(E::KIND, id).await
        };

        match result {
            Ok(()) => {
                info!("deleted {} {id}", E::KIND);
                if E::session(self).original_id() == Some(id) {
                    E::session_mut(self).cancel();
                }
                self.last_errors.remove(&tab);
                self.notices
                    .success(format!("{} deleted", capitalized(E::KIND)), "");
                if let Err(err) = self.reload::<E>().await {
                    debug!("reload of {} after delete failed: {err}", E::KIND.plural());
                }
                Ok(())
            }
            Err(source) => {
                warn!("delete {} {id} failed: {source}", E::KIND);
                let err = CatalogError::Mutation {
                    kind: E::KIND,
                    action: MutationAction::Delete,
                    source,
                };
                self.report_failure(tab, &err);
                Err(err)
            }
        }
    }

    // ── Filtering ────────────────────────────────────────────────

    /// Replaces the book filter and recomputes the visible set.
    pub async fn set_filter(&mut self, criteria: FilterCriteria) -> CatalogResult<Vec<RecordId>> {
        let api = Arc::clone(&self.api);
        let result = {
            let _guard = self.loading.begin(Tab::Books);
            self.filter.set_criteria(criteria, &*api, &self.books).await
        };
        if let Err(err) = &result {
            self.notices.error(err);
        }
        result
    }

    /// Re-runs the current filter, e.g. after books were added.
    pub async fn refresh_filter(&mut self) -> CatalogResult<Vec<RecordId>> {
        let criteria = self.filter.criteria().clone();
        self.set_filter(criteria).await
    }

    /// Books currently visible under the filter, in display order.
    pub fn visible_books(&self) -> Vec<&Book> {
        self.filter.visible(&self.books)
    }

    /// Visible books with author/publisher names resolved from the live stores.
    pub fn book_rows(&self) -> Vec<BookRow> {
        let resolver = self.resolver();
        self.visible_books()
            .into_iter()
            .map(|book| BookRow {
                id: book.id.clone(),
                title: book.title.clone(),
                category: book.category.clone(),
                year: book.year,
                available: book.available,
                author: resolver.author_name(book).map(str::to_string),
                publisher: resolver.publisher_name(book).map(str::to_string),
            })
            .collect()
    }

    // ── Report ───────────────────────────────────────────────────

    /// Downloads the catalog report document.
    pub async fn download_report(&mut self) -> CatalogResult<Vec<u8>> {
        debug!("requesting report");
        match self.api.download_report().await {
            Ok(bytes) => {
                self.notices
                    .success("Report downloaded", format!("{} bytes", bytes.len()));
                Ok(bytes)
            }
            Err(source) => {
                let err = CatalogError::Report(source);
                self.notices.error(&err);
                Err(err)
            }
        }
    }
}

async fn load_flagged<E: Listable>(
    loading: &LoadingState,
    store: &mut EntityStore<E>,
    api: &dyn CatalogApi,
) -> CatalogResult<usize> {
    let _guard = loading.begin(Tab::for_kind(E::KIND));
    store.load(api).await
}

fn capitalized(kind: EntityKind) -> String {
    let label = kind.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
