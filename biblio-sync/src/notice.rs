//! Transient user-visible notices.
//!
//! Every operation outcome the user should see (saved, deleted, failed to
//! load, ...) becomes a [`Notice`]. Success and info notices expire on their
//! own; warnings and errors stay until dismissed.

use crate::error::CatalogError;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
    pub created_at: Instant,
    /// `None` means the notice stays until dismissed.
    pub ttl: Option<Duration>,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            text: text.into(),
            created_at: Instant::now(),
            ttl: None,
        }
    }

    pub fn expiring(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.created_at) >= ttl)
    }
}

impl From<&CatalogError> for Notice {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Validation(v) => {
                Notice::new(NoticeLevel::Warning, "Required field", v.to_string())
            }
            CatalogError::Busy(_) => Notice::new(NoticeLevel::Warning, "Busy", err.to_string()),
            CatalogError::FilterQuery { .. } => {
                Notice::new(NoticeLevel::Error, "No matches", err.to_string())
            }
            _ => Notice::new(NoticeLevel::Error, "Error", err.to_string()),
        }
    }
}

/// Queue of notices with auto-expiry.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    ttl: Duration,
}

impl NoticeBoard {
    /// `ttl` applies to success and info notices.
    pub fn new(ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn info(&mut self, title: impl Into<String>, text: impl Into<String>) {
        let notice = Notice::new(NoticeLevel::Info, title, text).expiring(self.ttl);
        self.push(notice);
    }

    pub fn success(&mut self, title: impl Into<String>, text: impl Into<String>) {
        let notice = Notice::new(NoticeLevel::Success, title, text).expiring(self.ttl);
        self.push(notice);
    }

    pub fn error(&mut self, err: &CatalogError) {
        self.push(Notice::from(err));
    }

    /// Notices still visible at `now`; expired ones are dropped.
    pub fn active(&mut self, now: Instant) -> &[Notice] {
        self.notices.retain(|n| !n.is_expired(now));
        &self.notices
    }

    /// Removes the notice at `index` (as returned by [`active`](Self::active)).
    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    /// Takes every queued notice, expired or not.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
