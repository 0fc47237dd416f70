//! Client-side state synchronization for the library catalog console.
//!
//! Keeps local snapshots of the author, publisher and book collections in
//! step with the catalog server, manages the create/edit forms, and computes
//! the filtered book list.
//!
//! # Architecture
//!
//! Re-fetching is the only reconciliation mechanism: stores are replaced
//! wholesale after every mutation, never merged.
//!
//! ## Components
//!
//! - **Api**: the [`CatalogApi`] seam and its HTTP implementation
//! - **Store**: [`EntityStore`], the last successful snapshot of one collection
//! - **Session**: [`EditSession`], the record currently being created or edited
//! - **Resolver**: author/publisher names for book references
//! - **Filter**: [`FilterEngine`], intersection of per-criterion search results
//! - **Controller**: [`SyncController`], orchestrates loads, mutations and notices
//!
//! # Example
//!
//! ```no_run
//! use biblio_sync::{Availability, ClientConfig, FilterCriteria, SyncController};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut console = SyncController::connect(&ClientConfig::default())?;
//! console.activate().await;
//!
//! let criteria = FilterCriteria::default()
//!     .with_title("Dune")
//!     .with_availability(Availability::Available);
//! console.set_filter(criteria).await?;
//!
//! for row in console.book_rows() {
//!     println!("{} ({})", row.title, row.author.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod config;
mod controller;
pub mod draft;
mod error;
pub mod filter;
pub mod http;
pub mod loading;
pub mod notice;
pub mod resolver;
pub mod session;
pub mod store;

pub use api::{CatalogApi, Listable};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use controller::{BookRow, Collection, LoadReport, SyncController};
pub use draft::{AuthorDraft, BookDraft, Draft, FieldValue, PublisherDraft};
pub use error::{ApiError, ApiResult, CatalogError, CatalogResult, MutationAction, ValidationError};
pub use filter::{Availability, Criterion, CriterionSource, FilterCriteria, FilterEngine, FilteredView, intersect};
pub use http::HttpCatalogApi;
pub use loading::{LoadingGuard, LoadingState, Tab};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use resolver::{ReferenceResolver, UNKNOWN_AUTHOR, UNKNOWN_NAME, UNKNOWN_PUBLISHER, resolve_name, resolve_reference};
pub use session::{EditSession, SessionState, SubmitOutcome};
pub use store::EntityStore;

pub use biblio_types::{Author, Book, EntityKind, Publisher, RecordId, Reference};
