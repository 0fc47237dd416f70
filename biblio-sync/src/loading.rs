//! Per-view loading flags.
//!
//! Each tab has an in-flight counter. A view is loading while the counter is
//! non-zero; renderers hold a cloned [`LoadingState`] to disable controls.

use biblio_types::EntityKind;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One console view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Authors,
    Publishers,
    Books,
}

impl Tab {
    /// The view that owns a collection.
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Author => Tab::Authors,
            EntityKind::Publisher => Tab::Publishers,
            EntityKind::Book => Tab::Books,
        }
    }

    const fn index(self) -> usize {
        match self {
            Tab::Authors => 0,
            Tab::Publishers => 1,
            Tab::Books => 2,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tab::Authors => "authors",
            Tab::Publishers => "publishers",
            Tab::Books => "books",
        })
    }
}

/// Shared loading flags. Clones observe the same counters.
#[derive(Debug, Clone, Default)]
pub struct LoadingState {
    in_flight: Arc<[AtomicUsize; 3]>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self, tab: Tab) -> bool {
        self.in_flight(tab) > 0
    }

    /// Number of operations currently running for a view.
    pub fn in_flight(&self, tab: Tab) -> usize {
        self.in_flight[tab.index()].load(Ordering::Acquire)
    }

    /// Marks an operation as started. The flag clears when the guard drops.
    pub fn begin(&self, tab: Tab) -> LoadingGuard {
        self.in_flight[tab.index()].fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            state: self.clone(),
            tab,
        }
    }
}

/// Keeps a view marked as loading until dropped.
#[derive(Debug)]
#[must_use = "the view stops loading as soon as the guard is dropped"]
pub struct LoadingGuard {
    state: LoadingState,
    tab: Tab,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.in_flight[self.tab.index()].fetch_sub(1, Ordering::AcqRel);
    }
}
