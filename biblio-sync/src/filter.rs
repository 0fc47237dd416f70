//! Multi-criteria book filtering.
//!
//! Each active criterion is answered by its own server query. The visible
//! set is the intersection of the per-criterion id sets, ordered like the
//! first criterion's results. If any query fails the view is empty.

use crate::api::CatalogApi;
use crate::error::{ApiResult, CatalogError, CatalogResult};
use crate::store::EntityStore;
use async_trait::async_trait;
use biblio_types::{Book, RecordId};
use futures::future::join_all;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Availability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Any,
    Available,
    Unavailable,
}

impl Availability {
    fn as_flag(self) -> Option<bool> {
        match self {
            Availability::Any => None,
            Availability::Available => Some(true),
            Availability::Unavailable => Some(false),
        }
    }
}

/// One independent predicate answered by a single server query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Title contains the text.
    Title(String),
    /// Category contains the text.
    Category(String),
    /// Availability flag equals the value.
    Availability(bool),
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Title(text) => write!(f, "title ~ {text:?}"),
            Criterion::Category(text) => write!(f, "category ~ {text:?}"),
            Criterion::Availability(flag) => write!(f, "available = {flag}"),
        }
    }
}

/// The filter form. Blank text and [`Availability::Any`] mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub title: String,
    pub category: String,
    pub availability: Availability,
}

impl FilterCriteria {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// True when no criterion is active.
    pub fn is_default(&self) -> bool {
        self.active().is_empty()
    }

    /// Active criteria in query order: title, category, availability.
    ///
    /// Text goes to the server exactly as typed; whitespace-only text is
    /// inactive.
    pub fn active(&self) -> Vec<Criterion> {
        let mut active = Vec::with_capacity(3);
        if !self.title.trim().is_empty() {
            active.push(Criterion::Title(self.title.clone()));
        }
        if !self.category.trim().is_empty() {
            active.push(Criterion::Category(self.category.clone()));
        }
        if let Some(flag) = self.availability.as_flag() {
            active.push(Criterion::Availability(flag));
        }
        active
    }
}

/// Answers a single criterion with the ids of matching books.
///
/// Every [`CatalogApi`] is a source via its search endpoints; a combined
/// query backend can implement this directly.
#[async_trait]
pub trait CriterionSource: Send + Sync {
    async fn matching_ids(&self, criterion: &Criterion) -> ApiResult<Vec<RecordId>>;
}

#[async_trait]
impl<T: CatalogApi + ?Sized> CriterionSource for T {
    async fn matching_ids(&self, criterion: &Criterion) -> ApiResult<Vec<RecordId>> {
        let books = self.search_books(criterion).await?;
        Ok(books.into_iter().map(|b| b.id).collect())
    }
}

/// Intersects per-criterion results, keeping the first set's order.
///
/// Returns an empty list when there are no sets.
pub fn intersect(results: &[Vec<RecordId>]) -> Vec<RecordId> {
    let Some((first, rest)) = results.split_first() else {
        return Vec::new();
    };
    let others: Vec<HashSet<&RecordId>> = rest.iter().map(|ids| ids.iter().collect()).collect();
    let mut seen = HashSet::new();
    first
        .iter()
        .filter(|id| others.iter().all(|set| set.contains(id)))
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Result of the last filter computation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilteredView {
    /// No criterion active: every book in the store.
    #[default]
    Unfiltered,
    /// Ids matching every active criterion.
    Matches(Vec<RecordId>),
    /// A criterion query failed; nothing is shown.
    Failed,
}

/// Holds the active criteria and the view they produced.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    criteria: FilterCriteria,
    view: FilteredView,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Replaces the criteria and recomputes the view.
    pub async fn set_criteria<Q>(
        &mut self,
        criteria: FilterCriteria,
        source: &Q,
        books: &EntityStore<Book>,
    ) -> CatalogResult<Vec<RecordId>>
    where
        Q: CriterionSource + ?Sized,
    {
        self.criteria = criteria;
        self.apply(source, books).await
    }

    /// Recomputes the view for the current criteria and returns visible ids.
    ///
    /// All sub-queries are awaited before intersecting. On the first failed
    /// query the view becomes [`FilteredView::Failed`] and the error is
    /// returned.
    pub async fn apply<Q>(
        &mut self,
        source: &Q,
        books: &EntityStore<Book>,
    ) -> CatalogResult<Vec<RecordId>>
    where
        Q: CriterionSource + ?Sized,
    {
        let active = self.criteria.active();
        if active.is_empty() {
            self.view = FilteredView::Unfiltered;
            return Ok(self.visible_ids(books));
        }

        debug!("filtering books on {} criteria", active.len());
        let results = join_all(active.iter().map(|c| source.matching_ids(c))).await;

        let mut sets = Vec::with_capacity(results.len());
        for (criterion, result) in active.iter().zip(results) {
            match result {
                Ok(ids) => sets.push(ids),
                Err(err) => {
                    warn!("filter query {criterion} failed: {err}");
                    self.view = FilteredView::Failed;
                    return Err(CatalogError::FilterQuery {
                        criterion: criterion.to_string(),
                        source: err,
                    });
                }
            }
        }

        self.view = FilteredView::Matches(intersect(&sets));
        Ok(self.visible_ids(books))
    }

    /// Visible books, restricted to ids present in the current store.
    pub fn visible<'a>(&self, books: &'a EntityStore<Book>) -> Vec<&'a Book> {
        match &self.view {
            FilteredView::Unfiltered => books.iter().collect(),
            FilteredView::Matches(ids) => ids.iter().filter_map(|id| books.get(id)).collect(),
            FilteredView::Failed => Vec::new(),
        }
    }

    pub fn visible_ids(&self, books: &EntityStore<Book>) -> Vec<RecordId> {
        self.visible(books).into_iter().map(|b| b.id.clone()).collect()
    }
}
