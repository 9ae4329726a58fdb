//! Note entity and its write payloads.

use serde::{Deserialize, Serialize};

use crate::{NoteId, Timestamp};

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Body text. Stored in the `body` column, exposed as `content` on the wire.
    pub content: String,
    /// Free-form author; nullable in storage.
    pub author: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    /// Null until the first successful update.
    pub updated_at: Option<Timestamp>,
}

/// Fields supplied when creating a note. The store assigns id and created_at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub is_public: bool,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: None,
            is_public: false,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}

/// Partial update payload.
///
/// `None` leaves the column untouched. `Some` overwrites it, including
/// `Some(String::new())` and `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub is_public: Option<bool>,
}

impl NoteUpdate {
    /// True when no field is present. Such an update still refreshes
    /// `updated_at` on an existing note.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.is_public.is_none()
    }

    /// Apply the present fields to `note` and stamp `updated_at`.
    ///
    /// The stamp never precedes `created_at`, even if the clock stepped back.
    pub fn apply_to(&self, note: &mut Note, at: Timestamp) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(author) = &self.author {
            note.author = Some(author.clone());
        }
        if let Some(is_public) = self.is_public {
            note.is_public = is_public;
        }
        note.updated_at = Some(at.max(note.created_at));
    }
}
