//! Note list synchronizer.
//!
//! Owns the locally displayed list of notes and reconciles it with the
//! document store. The store is the source of truth: a successful fetch
//! replaces the whole list, a confirmed delete removes one element, and
//! nothing else mutates it.

mod surface;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use surface::{DisplaySurface, SurfaceHandle};

use crate::auth::{Identity, IdentityProvider, UserId};
use crate::error::{DeleteError, FetchError, SaveError};
use crate::models::{Note, NoteDocument, NoteId};
use crate::store::NoteStore;
use crate::util::unix_timestamp_millis_now;

const NOT_LOGGED_IN: &str = "User not logged in";

/// Lifecycle of the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenPhase {
    Uninitialized,
    Loading,
    /// Last refresh succeeded; zero notes is still `Populated`.
    Populated,
    /// Last refresh failed; the previous notes stay displayed.
    Error(String),
}

/// Read-only view of the synchronizer's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScreen {
    pub phase: ScreenPhase,
    pub notes: Vec<Note>,
}

impl Default for ListScreen {
    fn default() -> Self {
        Self {
            phase: ScreenPhase::Uninitialized,
            notes: Vec::new(),
        }
    }
}

/// Emitted by the editor after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSignal {
    Added(NoteId),
    Updated(NoteId),
}

impl CompletionSignal {
    pub const fn note_id(&self) -> &NoteId {
        match self {
            Self::Added(id) | Self::Updated(id) => id,
        }
    }
}

pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Cloneable handle; clones share the same list and surface.
#[derive(Clone)]
pub struct NoteListSynchronizer {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn NoteStore>,
    surface: Arc<dyn DisplaySurface>,
    handle: SurfaceHandle,
    screen: Arc<Mutex<ListScreen>>,
    clock: Clock,
}

impl NoteListSynchronizer {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn NoteStore>,
        surface: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            identity,
            store,
            surface,
            handle: SurfaceHandle::new(),
            screen: Arc::new(Mutex::new(ListScreen::default())),
            clock: Arc::new(unix_timestamp_millis_now),
        }
    }

    /// Replace the clock used to stamp saved notes (Unix ms).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Liveness handle for the display surface.
    pub fn surface_handle(&self) -> SurfaceHandle {
        self.handle.clone()
    }

    /// Mark the display surface as torn down.
    ///
    /// Waits for any state update in progress; once this returns no result
    /// is applied to the list or the surface again.
    pub async fn detach(&self) {
        let _screen = self.screen.lock().await;
        self.handle.detach();
    }

    pub async fn snapshot(&self) -> ListScreen {
        self.screen.lock().await.clone()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.screen.lock().await.notes.clone()
    }

    /// Fetch every note of `user_id` and replace the local list.
    ///
    /// On failure the previous list is kept and the phase becomes `Error`.
    /// Safe to call redundantly; whichever fetch completes last wins.
    pub async fn refresh(&self, user_id: &UserId) -> Result<Vec<Note>, FetchError> {
        match self.identity_for(user_id).await {
            Some(identity) => self.refresh_as(&identity).await,
            None => {
                let error = FetchError::PermissionDenied(NOT_LOGGED_IN.to_string());
                self.fail_refresh(&error).await;
                Err(error)
            }
        }
    }

    /// The list screen became visible again.
    pub async fn on_visible(&self) -> Result<Vec<Note>, FetchError> {
        tracing::debug!("List visible, reloading notes");
        self.refresh_current().await
    }

    /// The editor finished a save. Both kinds trigger the same reload.
    pub async fn on_completion(&self, signal: CompletionSignal) -> Result<Vec<Note>, FetchError> {
        tracing::debug!("Completion signal {:?} received, reloading notes", signal);
        self.refresh_current().await
    }

    /// Create (`note.id == None`) or fully overwrite a note.
    ///
    /// The local list is left alone; the next refresh shows the result.
    pub async fn save(&self, user_id: &UserId, note: &Note) -> Result<NoteId, SaveError> {
        if note.has_empty_title() {
            self.notify(&SaveError::EmptyTitle.to_string()).await;
            return Err(SaveError::EmptyTitle);
        }
        let Some(identity) = self.identity_for(user_id).await else {
            self.notify(NOT_LOGGED_IN).await;
            return Err(SaveError::NotAuthenticated);
        };

        let document = NoteDocument::from_note(note, (self.clock)());
        tracing::debug!(
            "Saving note: title={}, description={}",
            document.title,
            note.description_preview(20)
        );

        let result = match &note.id {
            None => self.store.create_note(&identity, &document).await,
            Some(id) => self
                .store
                .overwrite_note(&identity, id, &document)
                .await
                .map(|()| id.clone()),
        };

        match result {
            Ok(id) => {
                let verb = if note.is_new() { "added" } else { "updated" };
                tracing::info!("Note {} {}", id, verb);
                self.notify(&format!("Note {verb} successfully")).await;
                Ok(id)
            }
            Err(error) => {
                let error = SaveError::from(error);
                tracing::warn!("Error saving note: {}", error);
                self.notify(&error.to_string()).await;
                Err(error)
            }
        }
    }

    /// Delete `note_id` remotely, then drop the element at `position`.
    ///
    /// The local list changes only after the store confirms the delete.
    pub async fn delete(
        &self,
        user_id: &UserId,
        note_id: &NoteId,
        position: usize,
    ) -> Result<(), DeleteError> {
        let Some(identity) = self.identity_for(user_id).await else {
            self.notify(NOT_LOGGED_IN).await;
            return Err(DeleteError::NotAuthenticated);
        };

        tracing::debug!("Deleting note {} at position {}", note_id, position);
        if let Err(error) = self.store.delete_note(&identity, note_id).await {
            let error = DeleteError::from(error);
            tracing::warn!("Error deleting note {}: {}", note_id, error);
            self.notify(&error.to_string()).await;
            return Err(error);
        }

        tracing::info!("Note {} deleted", note_id);
        let mut screen = self.screen.lock().await;
        if !self.handle.is_attached() {
            tracing::debug!("Surface detached, not applying delete of {}", note_id);
            return Ok(());
        }
        if let Some(removed_at) = remove_confirmed(&mut screen.notes, note_id, position) {
            self.surface.remove_at(removed_at, &screen.notes);
        }
        self.surface.show_message("Note deleted");
        Ok(())
    }

    async fn refresh_current(&self) -> Result<Vec<Note>, FetchError> {
        if let Some(identity) = self.identity.current_identity().await {
            self.refresh_as(&identity).await
        } else {
            tracing::error!("Current user is missing, cannot load notes");
            let error = FetchError::PermissionDenied(NOT_LOGGED_IN.to_string());
            self.fail_refresh(&error).await;
            Err(error)
        }
    }

    async fn refresh_as(&self, identity: &Identity) -> Result<Vec<Note>, FetchError> {
        tracing::debug!("Loading notes for user {}", identity.user_id);
        {
            let mut screen = self.screen.lock().await;
            if self.handle.is_attached() {
                screen.phase = ScreenPhase::Loading;
                self.surface.loading();
            }
        }

        match self.store.list_notes(identity).await {
            Ok(notes) => {
                let mut screen = self.screen.lock().await;
                if !self.handle.is_attached() {
                    tracing::debug!("Surface detached, discarding {} fetched notes", notes.len());
                    return Ok(notes);
                }
                screen.notes.clone_from(&notes);
                screen.phase = ScreenPhase::Populated;
                self.surface.render(&screen.notes);
                tracing::debug!("Displayed {} notes", notes.len());
                Ok(notes)
            }
            Err(error) => {
                let error = FetchError::from(error);
                self.fail_refresh(&error).await;
                Err(error)
            }
        }
    }

    async fn fail_refresh(&self, error: &FetchError) {
        tracing::warn!("Error loading notes: {}", error);
        let mut screen = self.screen.lock().await;
        if self.handle.is_attached() {
            screen.phase = ScreenPhase::Error(error.to_string());
            self.surface.show_message(&format!("Error loading notes: {error}"));
        }
    }

    async fn notify(&self, message: &str) {
        let _screen = self.screen.lock().await;
        if self.handle.is_attached() {
            self.surface.show_message(message);
        }
    }

    async fn identity_for(&self, user_id: &UserId) -> Option<Identity> {
        let identity = self.identity.current_identity().await?;
        if &identity.user_id == user_id {
            Some(identity)
        } else {
            tracing::warn!(
                "Requested user {} does not match signed-in user {}",
                user_id,
                identity.user_id
            );
            None
        }
    }
}

/// Remove the confirmed-deleted note, preferring `position`.
///
/// Falls back to locating `note_id` when a refresh reordered the list since
/// the delete was issued. Returns the index actually removed.
fn remove_confirmed(notes: &mut Vec<Note>, note_id: &NoteId, position: usize) -> Option<usize> {
    let at_position = notes
        .get(position)
        .is_some_and(|note| note.id.as_ref() == Some(note_id));
    let index = if at_position {
        Some(position)
    } else {
        notes
            .iter()
            .position(|note| note.id.as_ref() == Some(note_id))
    };

    match index {
        Some(index) => {
            notes.remove(index);
            Some(index)
        }
        None => {
            tracing::error!(
                "Attempted to remove note {} at invalid position {}, size {}",
                note_id,
                position,
                notes.len()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests;
