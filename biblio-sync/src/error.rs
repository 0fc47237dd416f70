//! Error types for the catalog client.

use crate::loading::Tab;
use biblio_types::{EntityKind, RecordId};
use std::fmt;
use thiserror::Error;

/// Result type for collaborator API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures of the remote catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// Returns true if the server reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// A required or malformed draft field, caught before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            reason: "is required".to_string(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Which mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationAction::Create => "create",
            MutationAction::Update => "update",
            MutationAction::Delete => "delete",
        })
    }
}

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Draft failed local validation. No request was issued.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A store fetch failed. The store keeps its previous contents.
    #[error("could not load {}: {source}", .kind.plural())]
    Load {
        kind: EntityKind,
        #[source]
        source: ApiError,
    },

    /// Create, update or delete failed. The draft is preserved.
    #[error("could not {action} {kind}: {source}")]
    Mutation {
        kind: EntityKind,
        action: MutationAction,
        #[source]
        source: ApiError,
    },

    /// A filter sub-query failed. The filtered view is empty.
    #[error("filter query on {criterion} failed: {source}")]
    FilterQuery {
        criterion: String,
        #[source]
        source: ApiError,
    },

    /// Report download failed.
    #[error("could not download report: {0}")]
    Report(#[source] ApiError),

    /// Another operation on the same view is still in flight.
    #[error("{0} view is busy")]
    Busy(Tab),

    /// Submit was called with no draft.
    #[error("no record is being edited")]
    NoActiveSession,

    /// The draft has no field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The record is not in the local store.
    #[error("record not found: {0}")]
    NotFound(RecordId),
}

impl CatalogError {
    /// Returns true for failures caught locally, before any request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_)
                | CatalogError::Busy(_)
                | CatalogError::NoActiveSession
                | CatalogError::UnknownField(_)
                | CatalogError::NotFound(_)
        )
    }
}
