//! Remote per-user note collection.
//!
//! The document store is the single source of truth for notes. Implementations
//! only move documents; ordering and identity come from the store itself.

mod memory;
mod postgrest;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryNoteStore;
pub use postgrest::PostgrestNoteStore;

use crate::auth::Identity;
use crate::models::{Note, NoteDocument, NoteId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("{0}")]
    Unknown(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD plus ordered query over the signed-in user's notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes of the user, newest timestamp first.
    async fn list_notes(&self, identity: &Identity) -> StoreResult<Vec<Note>>;

    /// Create a record and return the identifier the store assigned.
    async fn create_note(&self, identity: &Identity, document: &NoteDocument)
        -> StoreResult<NoteId>;

    /// Replace every field of the record at `id`.
    async fn overwrite_note(
        &self,
        identity: &Identity,
        id: &NoteId,
        document: &NoteDocument,
    ) -> StoreResult<()>;

    async fn delete_note(&self, identity: &Identity, id: &NoteId) -> StoreResult<()>;
}
