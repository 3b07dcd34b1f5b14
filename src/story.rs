//! Story record type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled piece of HTML-bearing content with a visibility flag.
///
/// Timestamps serialize as RFC 3339 strings, so a collection written to the
/// snapshot slot reads back field-for-field identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier, immutable once assigned
    pub id: String,
    /// Story title
    pub title: String,
    /// Story body (may contain HTML markup)
    pub content: String,
    /// Hidden stories are excluded from list and random reads
    pub is_visible: bool,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// Create a new story with a time-derived id and both timestamps set to now.
    ///
    /// Used by the local backend; the remote backend assigns ids and
    /// timestamps server-side.
    pub fn new(title: impl Into<String>, content: impl Into<String>, is_visible: bool) -> Self {
        let now = Utc::now();
        Self {
            id: format!("story-{}", now.timestamp_micros()),
            title: title.into(),
            content: content.into(),
            is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` to now. `id` and `created_at` are never touched.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
