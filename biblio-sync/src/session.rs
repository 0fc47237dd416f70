//! Form/edit session state machine.
//!
//! ```text
//! Empty ──start_create/start_edit──▶ Editing ──submit──▶ Submitting
//!   ▲                                  ▲  │                 │
//!   │                                  │  └─ invalid draft  │
//!   │                                  └──── request failed ┤
//!   └──────────────── request succeeded ────────────────────┘
//! ```
//!
//! `cancel` returns to `Empty` from any state.

use crate::api::CatalogApi;
use crate::draft::{Draft, FieldValue};
use crate::error::{CatalogError, CatalogResult, MutationAction};
use crate::loading::Tab;
use biblio_types::{Entity, RecordId};
use tracing::{debug, info, warn};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState<D> {
    /// No draft.
    #[default]
    Empty,
    /// A draft is open. `original_id` is set when editing a stored record.
    Editing {
        draft: D,
        original_id: Option<RecordId>,
    },
    /// The draft has been sent and the response is pending.
    Submitting {
        draft: D,
        original_id: Option<RecordId>,
    },
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated(RecordId),
}

/// The single record currently being created or edited in one view.
#[derive(Debug, Clone, Default)]
pub struct EditSession<D> {
    state: SessionState<D>,
}

impl<D: Draft> EditSession<D> {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
        }
    }

    pub fn state(&self) -> &SessionState<D> {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SessionState::Empty)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SessionState::Editing { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    /// The open draft, while editing or submitting.
    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Editing { draft, .. } | SessionState::Submitting { draft, .. } => {
                Some(draft)
            }
        }
    }

    /// Id of the record being edited; `None` for a new record or no session.
    pub fn original_id(&self) -> Option<&RecordId> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Editing { original_id, .. }
            | SessionState::Submitting { original_id, .. } => original_id.as_ref(),
        }
    }

    /// Opens a blank draft for a new record.
    pub fn start_create(&mut self) {
        self.state = SessionState::Editing {
            draft: D::default(),
            original_id: None,
        };
    }

    /// Opens a draft pre-populated from a stored record.
    pub fn start_edit(&mut self, record: &D::Record) {
        debug!("editing {} {}", <D::Record as Entity>::KIND, record.id());
        self.state = SessionState::Editing {
            draft: D::from_record(record),
            original_id: Some(record.id().clone()),
        };
    }

    /// Changes one draft field.
    pub fn update_field(&mut self, name: &str, value: impl Into<FieldValue>) -> CatalogResult<()> {
        match &mut self.state {
            SessionState::Editing { draft, .. } => draft.set_field(name, value.into()),
            SessionState::Empty => Err(CatalogError::NoActiveSession),
            SessionState::Submitting { .. } => Err(CatalogError::Busy(Self::tab())),
        }
    }

    /// Validates and sends the draft.
    ///
    /// A blank required field fails with [`CatalogError::Validation`] without
    /// any request. On success the session becomes `Empty`; on a failed
    /// request it returns to `Editing` with the draft intact.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> CatalogResult<SubmitOutcome> {
        let kind = <D::Record as Entity>::KIND;
        let body = match &self.state {
            SessionState::Editing { draft, .. } => draft.to_payload()?,
            SessionState::Empty => return Err(CatalogError::NoActiveSession),
            SessionState::Submitting { .. } => return Err(CatalogError::Busy(Self::tab())),
        };

        let (draft, original_id) = match std::mem::take(&mut self.state) {
            SessionState::Editing { draft, original_id } => (draft, original_id),
            // checked above
            other => {
                self.state = other;
                return Err(CatalogError::NoActiveSession);
            }
        };
        self.state = SessionState::Submitting {
            draft,
            original_id: original_id.clone(),
        };

        let (action, result) = match &original_id {
            None => (MutationAction::Create, api.create(kind, &body).await),
            Some(id) => (MutationAction::Update, api.update(kind, id, &body).await),
        };

        match result {
            Ok(()) => {
                info!("{action} {kind} succeeded");
                self.state = SessionState::Empty;
                Ok(match original_id {
                    None => SubmitOutcome::Created,
                    Some(id) => SubmitOutcome::Updated(id),
                })
            }
            Err(source) => {
                warn!("{action} {kind} failed: {source}");
                self.state = match std::mem::take(&mut self.state) {
                    SessionState::Submitting { draft, original_id } => {
                        SessionState::Editing { draft, original_id }
                    }
                    other => other,
                };
                Err(CatalogError::Mutation {
                    kind,
                    action,
                    source,
                })
            }
        }
    }

    /// Discards the draft, whatever the current state.
    pub fn cancel(&mut self) {
        self.state = SessionState::Empty;
    }

    fn tab() -> Tab {
        Tab::for_kind(<D::Record as Entity>::KIND)
    }
}
