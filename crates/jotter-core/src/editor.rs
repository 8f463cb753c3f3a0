//! Note editor: create or edit one note, then signal completion.

use crate::auth::UserId;
use crate::error::SaveError;
use crate::models::Note;
use crate::sync::{CompletionSignal, NoteListSynchronizer};

/// Whether the editor creates a new note or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Completed(CompletionSignal),
    Cancelled,
}

pub struct NoteEditor {
    synchronizer: NoteListSynchronizer,
    user_id: UserId,
    existing: Option<Note>,
}

impl NoteEditor {
    /// Open the editor; `existing == None` means create mode.
    pub fn open(synchronizer: NoteListSynchronizer, user_id: UserId, existing: Option<Note>) -> Self {
        match existing.as_ref().and_then(|note| note.id.as_ref()) {
            Some(id) => tracing::debug!("Opening existing note {}", id),
            None => tracing::debug!("Creating new note"),
        }
        Self {
            synchronizer,
            user_id,
            existing,
        }
    }

    pub fn mode(&self) -> EditorMode {
        match self.existing.as_ref() {
            Some(note) if !note.is_new() => EditorMode::Edit,
            _ => EditorMode::Create,
        }
    }

    /// Prefilled field values.
    pub fn initial_fields(&self) -> (&str, &str) {
        self.existing
            .as_ref()
            .map_or(("", ""), |note| (note.title.as_str(), note.description.as_str()))
    }

    /// Save the entered fields.
    ///
    /// Returns the single completion signal for this save; nothing is emitted
    /// when the save fails.
    pub async fn submit(&self, title: &str, description: &str) -> Result<CompletionSignal, SaveError> {
        let note = Note {
            id: self.existing.as_ref().and_then(|note| note.id.clone()),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            timestamp: self.existing.as_ref().map_or(0, |note| note.timestamp),
        };

        let id = self.synchronizer.save(&self.user_id, &note).await?;
        let signal = match self.mode() {
            EditorMode::Create => CompletionSignal::Added(id),
            EditorMode::Edit => CompletionSignal::Updated(id),
        };
        tracing::debug!("Emitting completion signal {:?}", signal);
        Ok(signal)
    }

    /// Leave without saving; emits no signal.
    pub fn cancel(self) -> EditorOutcome {
        tracing::debug!("Editor closed without saving");
        EditorOutcome::Cancelled
    }
}
