//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the document store when a note is first saved
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap a store-assigned identifier, rejecting blank values
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A note in the current user's collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier, `None` until first save
    pub id: Option<NoteId>,
    pub title: String,
    pub description: String,
    /// Creation/update timestamp (Unix ms), only used for ordering
    pub timestamp: i64,
}

impl Note {
    /// Create an unsaved note
    #[must_use]
    pub fn draft(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            timestamp: 0,
        }
    }

    /// Whether this note has never been persisted
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check if the title is blank (whitespace-only counts as blank)
    #[must_use]
    pub fn has_empty_title(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Description truncated to `max_len` characters for log lines and previews
    #[must_use]
    pub fn description_preview(&self, max_len: usize) -> String {
        let mut chars = self.description.chars();
        let preview: String = chars.by_ref().take(max_len).collect();
        if chars.next().is_some() {
            format!("{preview}...")
        } else {
            preview
        }
    }
}

/// Stored form of a note: the three fields kept in the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    pub title: String,
    pub description: String,
    pub timestamp: i64,
}

impl NoteDocument {
    /// Build the document for `note`, trimming text and stamping `timestamp`
    #[must_use]
    pub fn from_note(note: &Note, timestamp: i64) -> Self {
        Self {
            title: note.title.trim().to_string(),
            description: note.description.trim().to_string(),
            timestamp,
        }
    }

    /// Attach an identifier to produce a listed note
    #[must_use]
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id: Some(id),
            title: self.title,
            description: self.description,
            timestamp: self.timestamp,
        }
    }
}
