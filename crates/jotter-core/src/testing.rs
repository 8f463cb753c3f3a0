//! Test doubles shared by the unit tests of this crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::auth::{AuthError, AuthResult, Identity, IdentityProvider, UserId};
use crate::models::{Note, NoteDocument, NoteId};
use crate::store::{MemoryNoteStore, NoteStore, StoreError, StoreResult};
use crate::sync::DisplaySurface;

pub fn identity(user: &str) -> Identity {
    Identity {
        user_id: UserId::new(user),
        email: Some(format!("{user}@example.com")),
        access_token: format!("token-{user}"),
    }
}

pub fn document(title: &str, timestamp: i64) -> NoteDocument {
    NoteDocument {
        title: title.to_string(),
        description: String::new(),
        timestamp,
    }
}

pub fn titles(notes: &[Note]) -> Vec<String> {
    notes.iter().map(|note| note.title.clone()).collect()
}

pub struct FakeIdentityProvider {
    current: Mutex<Option<Identity>>,
    reject_with: Option<String>,
    sign_in_calls: AtomicUsize,
}

impl FakeIdentityProvider {
    pub fn signed_in(user: &str) -> Self {
        Self {
            current: Mutex::new(Some(identity(user))),
            reject_with: None,
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            current: Mutex::new(None),
            reject_with: None,
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::signed_out()
        }
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn set_current(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap() = identity;
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().unwrap().clone()
    }

    async fn sign_in(&self, email: &str, _password: &str) -> AuthResult<Identity> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.reject_with {
            return Err(AuthError::InvalidCredentials(message.clone()));
        }
        let identity = Identity {
            user_id: UserId::new("user-1"),
            email: Some(email.to_string()),
            access_token: "token".to_string(),
        };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.set_current(None);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Loading,
    Render(Vec<String>),
    RemoveAt(usize),
    Message(String),
}

#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl DisplaySurface for RecordingSurface {
    fn loading(&self) {
        self.push(SurfaceEvent::Loading);
    }

    fn render(&self, notes: &[Note]) {
        self.push(SurfaceEvent::Render(titles(notes)));
    }

    fn remove_at(&self, position: usize, _remaining: &[Note]) {
        self.push(SurfaceEvent::RemoveAt(position));
    }

    fn show_message(&self, message: &str) {
        self.push(SurfaceEvent::Message(message.to_string()));
    }
}

/// Memory store with injectable failures and hand-released list calls.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryNoteStore,
    fail_list: Mutex<Option<StoreError>>,
    fail_save: Mutex<Option<StoreError>>,
    fail_delete: Mutex<Option<StoreError>>,
    hold_lists: AtomicBool,
    pending_lists: Mutex<Vec<Option<oneshot::Sender<()>>>>,
}

impl ScriptedStore {
    pub fn fail_next_list(&self, error: StoreError) {
        *self.fail_list.lock().unwrap() = Some(error);
    }

    pub fn fail_next_save(&self, error: StoreError) {
        *self.fail_save.lock().unwrap() = Some(error);
    }

    pub fn fail_next_delete(&self, error: StoreError) {
        *self.fail_delete.lock().unwrap() = Some(error);
    }

    /// Make list calls take their snapshot and then wait for `release_list`.
    pub fn hold_lists(&self) {
        self.hold_lists.store(true, Ordering::SeqCst);
    }

    /// Release the `index`-th held list call (0-based, in arrival order).
    pub fn release_list(&self, index: usize) {
        let sender = self.pending_lists.lock().unwrap()[index].take();
        if let Some(sender) = sender {
            let _ = sender.send(());
        }
    }

    pub async fn wait_for_held_lists(&self, count: usize) {
        while self.pending_lists.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    fn take(slot: &Mutex<Option<StoreError>>) -> StoreResult<()> {
        slot.lock().unwrap().take().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl NoteStore for ScriptedStore {
    async fn list_notes(&self, identity: &Identity) -> StoreResult<Vec<Note>> {
        Self::take(&self.fail_list)?;
        let snapshot = self.inner.list_notes(identity).await?;
        if self.hold_lists.load(Ordering::SeqCst) {
            let (sender, receiver) = oneshot::channel();
            self.pending_lists.lock().unwrap().push(Some(sender));
            let _ = receiver.await;
        }
        Ok(snapshot)
    }

    async fn create_note(
        &self,
        identity: &Identity,
        document: &NoteDocument,
    ) -> StoreResult<NoteId> {
        Self::take(&self.fail_save)?;
        self.inner.create_note(identity, document).await
    }

    async fn overwrite_note(
        &self,
        identity: &Identity,
        id: &NoteId,
        document: &NoteDocument,
    ) -> StoreResult<()> {
        Self::take(&self.fail_save)?;
        self.inner.overwrite_note(identity, id, document).await
    }

    async fn delete_note(&self, identity: &Identity, id: &NoteId) -> StoreResult<()> {
        Self::take(&self.fail_delete)?;
        self.inner.delete_note(identity, id).await
    }
}
