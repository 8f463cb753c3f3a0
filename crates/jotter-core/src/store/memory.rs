//! In-process note store, primarily for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{NoteStore, StoreError, StoreResult};
use crate::auth::Identity;
use crate::models::{Note, NoteDocument, NoteId};

/// Per-user collections keyed by sequentially assigned string ids.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    collections: Arc<Mutex<HashMap<String, Vec<(NoteId, NoteDocument)>>>>,
    next_id: Arc<AtomicU64>,
    requests: Arc<AtomicU64>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document as if another device had written it.
    pub fn seed(&self, user_id: &str, document: NoteDocument) -> StoreResult<NoteId> {
        let id = self.assign_id()?;
        let mut collections = self.lock()?;
        collections
            .entry(user_id.to_string())
            .or_default()
            .push((id.clone(), document));
        Ok(id)
    }

    /// Number of store operations served so far (seeding excluded).
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of documents held for `user_id`.
    pub fn document_count(&self, user_id: &str) -> usize {
        self.lock()
            .map(|collections| collections.get(user_id).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn assign_id(&self) -> StoreResult<NoteId> {
        let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        NoteId::new(next.to_string())
            .ok_or_else(|| StoreError::Unknown("failed to assign note id".to_string()))
    }

    fn lock(
        &self,
    ) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, Vec<(NoteId, NoteDocument)>>>> {
        self.collections
            .lock()
            .map_err(|error| StoreError::Unknown(error.to_string()))
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list_notes(&self, identity: &Identity) -> StoreResult<Vec<Note>> {
        self.record_request();
        let collections = self.lock()?;
        let mut notes = collections
            .get(identity.user_id.as_str())
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, document)| document.clone().into_note(id.clone()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        notes.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        Ok(notes)
    }

    async fn create_note(
        &self,
        identity: &Identity,
        document: &NoteDocument,
    ) -> StoreResult<NoteId> {
        self.record_request();
        let id = self.assign_id()?;
        let mut collections = self.lock()?;
        collections
            .entry(identity.user_id.to_string())
            .or_default()
            .push((id.clone(), document.clone()));
        Ok(id)
    }

    async fn overwrite_note(
        &self,
        identity: &Identity,
        id: &NoteId,
        document: &NoteDocument,
    ) -> StoreResult<()> {
        self.record_request();
        let mut collections = self.lock()?;
        let documents = collections
            .entry(identity.user_id.to_string())
            .or_default();
        if let Some((_, existing)) = documents.iter_mut().find(|(existing, _)| existing == id) {
            *existing = document.clone();
        } else {
            documents.push((id.clone(), document.clone()));
        }
        Ok(())
    }

    async fn delete_note(&self, identity: &Identity, id: &NoteId) -> StoreResult<()> {
        self.record_request();
        let mut collections = self.lock()?;
        if let Some(documents) = collections.get_mut(identity.user_id.as_str()) {
            documents.retain(|(existing, _)| existing != id);
        }
        Ok(())
    }
}
